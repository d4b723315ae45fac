use serde::Serialize;

use crate::{
    app::{Artifact, StudySession},
    cli::OutputFormat,
    models::Gateway,
    prompts::{parse_flashcards, parse_quiz, raw_card_lines, Flashcard, QuizQuestion, StudyTask},
    utils::StudyResult,
};

/// Structured view of an artifact for JSON output
#[derive(Debug, Serialize)]
struct RenderedArtifact<'a> {
    #[serde(flatten)]
    artifact: &'a Artifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    flashcards: Option<Vec<Flashcard>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quiz: Option<Vec<QuizQuestion>>,
}

/// Runs a single study task and formats the result
pub struct NonInteractiveRunner<'a> {
    gateway: &'a Gateway,
    session: StudySession,
    format: OutputFormat,
}

impl<'a> NonInteractiveRunner<'a> {
    pub fn new(gateway: &'a Gateway, session: StudySession, format: OutputFormat) -> Self {
        Self {
            gateway,
            session,
            format,
        }
    }

    /// Execute one task and return the formatted artifact
    pub async fn execute(&mut self, task: StudyTask) -> StudyResult<String> {
        let artifact = self.session.run(self.gateway, task).await?;
        Ok(format_artifact(&artifact, self.format))
    }
}

fn flashcard_limit(task: &StudyTask) -> usize {
    match task {
        StudyTask::Flashcards { count } => *count as usize,
        _ => usize::MAX,
    }
}

/// Format an artifact according to the output format
pub fn format_artifact(artifact: &Artifact, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let rendered = RenderedArtifact {
                artifact,
                flashcards: matches!(artifact.task, StudyTask::Flashcards { .. })
                    .then(|| parse_flashcards(&artifact.body, flashcard_limit(&artifact.task))),
                quiz: matches!(artifact.task, StudyTask::Quiz { .. })
                    .then(|| parse_quiz(&artifact.body)),
            };
            serde_json::to_string_pretty(&rendered).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize artifact: {}\"}}", e)
            })
        }
        OutputFormat::Text => {
            let mut output = format!("{}\n\n", artifact.label);
            output.push_str(&body_text(artifact, false));
            output
        }
        OutputFormat::Markdown => {
            let mut output = format!("## {}\n\n", artifact.label);
            output.push_str(&body_text(artifact, true));
            output.push_str("\n\n---\n");
            output.push_str(&format!(
                "*Backend: {} | {}*\n",
                artifact.backend,
                artifact.created_at.format("%Y-%m-%d %H:%M")
            ));
            output
        }
    }
}

fn body_text(artifact: &Artifact, markdown: bool) -> String {
    match &artifact.task {
        StudyTask::Flashcards { .. } => {
            let limit = flashcard_limit(&artifact.task);
            let cards = parse_flashcards(&artifact.body, limit);
            if cards.is_empty() {
                // Unstructured output: one card per line, as generated
                raw_card_lines(&artifact.body, limit)
                    .iter()
                    .enumerate()
                    .map(|(i, line)| card_heading(i, markdown) + line)
                    .collect::<Vec<_>>()
                    .join("\n\n")
            } else {
                cards
                    .iter()
                    .enumerate()
                    .map(|(i, card)| {
                        if markdown {
                            format!(
                                "{}**Q:** {}  \n**A:** {}",
                                card_heading(i, true),
                                card.question,
                                card.answer
                            )
                        } else {
                            format!(
                                "{}  Q: {}\n  A: {}",
                                card_heading(i, false),
                                card.question,
                                card.answer
                            )
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n")
            }
        }
        StudyTask::Quiz { .. } => {
            let questions = parse_quiz(&artifact.body);
            if questions.is_empty() {
                return artifact.body.clone();
            }
            questions
                .iter()
                .enumerate()
                .map(|(i, q)| {
                    let mut block = if markdown {
                        format!("**{}. {}**\n", i + 1, q.prompt)
                    } else {
                        format!("{}. {}\n", i + 1, q.prompt)
                    };
                    for option in &q.options {
                        let bullet = if markdown { "- " } else { "   " };
                        block.push_str(&format!("{}{}) {}\n", bullet, option.letter, option.text));
                    }
                    if let Some(answer) = q.answer {
                        block.push_str(&format!("   Answer: {}", answer));
                    }
                    block.trim_end().to_string()
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        }
        _ => artifact.body.clone(),
    }
}

fn card_heading(index: usize, markdown: bool) -> String {
    if markdown {
        format!("**Card {}**\n\n", index + 1)
    } else {
        format!("Card {}\n", index + 1)
    }
}
