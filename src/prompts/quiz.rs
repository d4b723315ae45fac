use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub letter: char,
    pub text: String,
}

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<QuizOption>,
    /// Correct letter, when the backend stated one
    pub answer: Option<char>,
}

static ANSWER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:correct\s+)?answer\s*(?:is)?\s*[:\-]?\s*\(?([a-d])\b").expect("valid regex")
});

static OPTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?([A-Da-d])[).:]\s+(.+)$").expect("valid regex"));

static QUESTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:q|question)\s*)?\d+\s*[.):]\s*(.+)$|^(?:q|question)\s*[.):]\s*(.+)$")
        .expect("valid regex")
});

/// Parse generated quiz text. Best effort: questions with fewer than two
/// recognizable options are dropped, everything unrecognized is skipped.
pub fn parse_quiz(text: &str) -> Vec<QuizQuestion> {
    let mut questions = Vec::new();
    let mut current: Option<QuizQuestion> = None;

    for raw in text.lines() {
        let cleaned = raw.replace("**", "");
        let line = cleaned.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = ANSWER_LINE.captures(line) {
            if let (Some(question), Some(letter)) = (current.as_mut(), caps[1].chars().next()) {
                question.answer = Some(letter.to_ascii_uppercase());
            }
        } else if let Some(caps) = OPTION_LINE.captures(line) {
            if let (Some(question), Some(letter)) = (current.as_mut(), caps[1].chars().next()) {
                question.options.push(QuizOption {
                    letter: letter.to_ascii_uppercase(),
                    text: caps[2].trim().to_string(),
                });
            }
        } else if let Some(caps) = QUESTION_LINE.captures(line) {
            if let Some(done) = current.take() {
                questions.push(done);
            }
            let prompt = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            current = Some(QuizQuestion {
                prompt: prompt.trim().to_string(),
                options: Vec::new(),
                answer: None,
            });
        } else if let Some(question) = current.as_mut() {
            // Wrapped question text before the options start
            if question.options.is_empty() {
                question.prompt.push(' ');
                question.prompt.push_str(line);
            }
        }
    }
    if let Some(done) = current.take() {
        questions.push(done);
    }

    questions.retain(|q| q.options.len() >= 2 && !q.prompt.is_empty());
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const QUIZ: &str = "Here is your quiz:\n\
        1. What does photosynthesis produce?\n\
        A) Oxygen and glucose\n\
        B) Carbon dioxide\n\
        C) Nitrogen\n\
        D) Methane\n\
        Answer: A\n\
        \n\
        Question 2: Where does it take place\n\
        in the plant cell?\n\
        (a) Nucleus\n\
        (b) Chloroplast\n\
        (c) Ribosome\n\
        (d) Vacuole\n\
        Correct answer: b";

    #[test]
    fn test_parses_numbered_questions() {
        let quiz = parse_quiz(QUIZ);
        assert_eq!(quiz.len(), 2);

        assert_eq!(quiz[0].prompt, "What does photosynthesis produce?");
        assert_eq!(quiz[0].options.len(), 4);
        assert_eq!(quiz[0].options[0].text, "Oxygen and glucose");
        assert_eq!(quiz[0].answer, Some('A'));

        assert_eq!(quiz[1].prompt, "Where does it take place in the plant cell?");
        assert_eq!(quiz[1].options[1].letter, 'B');
        assert_eq!(quiz[1].options[1].text, "Chloroplast");
        assert_eq!(quiz[1].answer, Some('B'));
    }

    #[test]
    fn test_question_without_options_is_dropped() {
        let quiz = parse_quiz("1. Lonely question?\nAnswer: C\n2. Real one?\nA. yes\nB. no");
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].prompt, "Real one?");
        assert_eq!(quiz[0].answer, None);
    }

    #[test]
    fn test_free_text_yields_nothing() {
        assert!(parse_quiz("The quiz could not be generated.").is_empty());
    }
}
