use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::constants::{
    EXPLAIN_LENGTH_BUDGET, FLASHCARD_COUNT_MAX, FLASHCARD_COUNT_MIN, FLASHCARD_LENGTH_BUDGET,
    QUIZ_LENGTH_BUDGET, QUIZ_QUESTIONS_MAX, QUIZ_QUESTIONS_MIN, SUMMARY_LENGTH_BUDGET,
};
use crate::utils::{StudyError, StudyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum SummaryLength {
    #[default]
    Short,
    Medium,
    Long,
}

impl SummaryLength {
    pub fn label(self) -> &'static str {
        match self {
            SummaryLength::Short => "Short (3-4 lines)",
            SummaryLength::Medium => "Medium (1 paragraph)",
            SummaryLength::Long => "Long (detailed)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Tone {
    #[default]
    Neutral,
    Motivational,
    #[value(alias = "exam")]
    ExamFocused,
}

impl Tone {
    pub fn label(self) -> &'static str {
        match self {
            Tone::Neutral => "Neutral",
            Tone::Motivational => "Motivational",
            Tone::ExamFocused => "Exam-focused",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Level {
    Eli5,
    #[default]
    HighSchool,
    College,
    Expert,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Eli5 => "Eli5",
            Level::HighSchool => "High-school",
            Level::College => "College",
            Level::Expert => "Expert",
        }
    }
}

/// One study action the user can request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum StudyTask {
    Summarize { length: SummaryLength, tone: Tone },
    Explain { topic: String, level: Level },
    Flashcards { count: u32 },
    Quiz { questions: u32 },
}

impl StudyTask {
    pub fn flashcards(count: u32) -> Self {
        StudyTask::Flashcards {
            count: count.clamp(FLASHCARD_COUNT_MIN, FLASHCARD_COUNT_MAX),
        }
    }

    pub fn quiz(questions: u32) -> Self {
        StudyTask::Quiz {
            questions: questions.clamp(QUIZ_QUESTIONS_MIN, QUIZ_QUESTIONS_MAX),
        }
    }

    /// Heading the artifact is shown under
    pub fn label(&self) -> &'static str {
        match self {
            StudyTask::Summarize { .. } => "Summary",
            StudyTask::Explain { .. } => "Explanation",
            StudyTask::Flashcards { .. } => "Flashcards",
            StudyTask::Quiz { .. } => "Quiz",
        }
    }

    /// Whether the task works on the saved notes
    pub fn needs_notes(&self) -> bool {
        !matches!(self, StudyTask::Explain { .. })
    }

    /// Advisory output cap handed to the gateway
    pub fn length_budget(&self) -> usize {
        match self {
            StudyTask::Summarize { .. } => SUMMARY_LENGTH_BUDGET,
            StudyTask::Explain { .. } => EXPLAIN_LENGTH_BUDGET,
            StudyTask::Flashcards { .. } => FLASHCARD_LENGTH_BUDGET,
            StudyTask::Quiz { .. } => QUIZ_LENGTH_BUDGET,
        }
    }

    /// Build the instruction, validating required input first
    pub fn instruction(&self, notes: Option<&str>) -> StudyResult<String> {
        match self {
            StudyTask::Explain { topic, level } => {
                let topic = topic.trim();
                if topic.is_empty() {
                    return Err(StudyError::missing("Type a topic first."));
                }
                Ok(format!(
                    "Explain '{}' at {} level with analogies and 3 examples.",
                    topic,
                    level.label()
                ))
            }
            StudyTask::Summarize { length, tone } => Ok(format!(
                "summarize the following text into a {} tone:{}:\n\n{}",
                length.label(),
                tone.label(),
                require_notes(notes)?
            )),
            StudyTask::Flashcards { count } => Ok(format!(
                "Create {} concise question-answer flashcards from this text. Format each as Q: ... A: ...\n\n{}",
                count,
                require_notes(notes)?
            )),
            StudyTask::Quiz { questions } => Ok(format!(
                "Make a {}-question multiple choice quiz (4 options each) from the text. Mark the correct answer. Provide questions, options labeled A-D, and answer letter.\n\n{}",
                questions,
                require_notes(notes)?
            )),
        }
    }
}

fn require_notes(notes: Option<&str>) -> StudyResult<&str> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| StudyError::missing("No notes saved. Load or paste your notes first."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NOTES: &str = "Photosynthesis converts light into chemical energy.";

    #[test]
    fn test_summary_instruction() {
        let task = StudyTask::Summarize {
            length: SummaryLength::Short,
            tone: Tone::ExamFocused,
        };
        assert_eq!(
            task.instruction(Some(NOTES)).unwrap(),
            format!(
                "summarize the following text into a Short (3-4 lines) tone:Exam-focused:\n\n{}",
                NOTES
            )
        );
        assert_eq!(task.length_budget(), 300);
        assert_eq!(task.label(), "Summary");
    }

    #[test]
    fn test_explain_ignores_notes_and_needs_topic() {
        let task = StudyTask::Explain {
            topic: "  Fourier transform ".to_string(),
            level: Level::Eli5,
        };
        assert!(!task.needs_notes());
        assert_eq!(
            task.instruction(None).unwrap(),
            "Explain 'Fourier transform' at Eli5 level with analogies and 3 examples."
        );

        let blank = StudyTask::Explain {
            topic: " ".to_string(),
            level: Level::College,
        };
        assert!(matches!(
            blank.instruction(Some(NOTES)),
            Err(StudyError::MissingInput(_))
        ));
    }

    #[test]
    fn test_notes_tasks_require_notes() {
        for task in [
            StudyTask::flashcards(8),
            StudyTask::quiz(5),
            StudyTask::Summarize {
                length: SummaryLength::Long,
                tone: Tone::Neutral,
            },
        ] {
            assert!(task.needs_notes());
            assert!(matches!(
                task.instruction(None),
                Err(StudyError::MissingInput(_))
            ));
            assert!(matches!(
                task.instruction(Some("  \n ")),
                Err(StudyError::MissingInput(_))
            ));
        }
    }

    #[test]
    fn test_counts_are_clamped() {
        assert_eq!(StudyTask::flashcards(1), StudyTask::Flashcards { count: 3 });
        assert_eq!(StudyTask::flashcards(99), StudyTask::Flashcards { count: 30 });
        assert_eq!(StudyTask::quiz(0), StudyTask::Quiz { questions: 3 });
        assert_eq!(StudyTask::quiz(40), StudyTask::Quiz { questions: 15 });
    }

    #[test]
    fn test_quiz_includes_the_notes() {
        let instruction = StudyTask::quiz(5).instruction(Some(NOTES)).unwrap();
        assert!(instruction.starts_with("Make a 5-question multiple choice quiz"));
        assert!(instruction.ends_with(NOTES));
    }

    #[test]
    fn test_flashcard_instruction_asks_for_q_a_format() {
        let instruction = StudyTask::flashcards(12).instruction(Some(NOTES)).unwrap();
        assert!(instruction.contains("Create 12 concise question-answer flashcards"));
        assert!(instruction.contains("Format each as Q: ... A: ..."));
    }

    #[test]
    fn test_tone_accepts_exam_alias() {
        assert_eq!(Tone::from_str("exam", true), Ok(Tone::ExamFocused));
        assert_eq!(Level::from_str("high-school", true), Ok(Level::HighSchool));
    }
}
