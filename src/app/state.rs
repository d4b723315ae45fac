use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::documents::extract_file;
use crate::models::{BackendKind, Gateway, PromptStyle, SessionConfig};
use crate::prompts::StudyTask;
use crate::utils::{StudyError, StudyResult};

/// A generated study result kept for the session
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// Heading: "Summary", "Explanation", "Flashcards" or "Quiz"
    pub label: String,
    pub task: StudyTask,
    pub body: String,
    /// Backend that actually served the request
    pub backend: BackendKind,
    pub created_at: DateTime<Local>,
}

/// In-memory study session: notes, backend choice and produced artifacts.
/// Nothing here outlives the process.
#[derive(Debug, Default)]
pub struct StudySession {
    notes: Option<String>,
    config: SessionConfig,
    artifacts: Vec<Artifact>,
}

impl StudySession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            notes: None,
            config,
            artifacts: Vec::new(),
        }
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Replace the saved notes wholesale
    pub fn save_notes(&mut self, text: impl Into<String>) -> StudyResult<()> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(StudyError::missing("Nothing to save: the notes are empty."));
        }
        info!("Saved {} characters of notes", text.len());
        self.notes = Some(text);
        Ok(())
    }

    /// Extract a document and save it as the notes; returns the character count.
    /// An unreadable path leaves the current notes untouched.
    pub fn load_document(&mut self, path: &Path) -> StudyResult<usize> {
        let text = extract_file(path)?;
        let chars = text.chars().count();
        self.save_notes(text)?;
        Ok(chars)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_backend(&mut self, backend: BackendKind) {
        self.config.backend = backend;
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.config.api_key = api_key;
    }

    pub fn set_style(&mut self, style: PromptStyle) {
        self.config.style = style;
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Run one study task through the gateway and log the artifact
    pub async fn run(&mut self, gateway: &Gateway, task: StudyTask) -> StudyResult<Artifact> {
        let instruction = task.instruction(self.notes.as_deref())?;
        let backend = self.config.effective_backend();

        let body = gateway
            .generate(&self.config, &instruction, task.length_budget())
            .await?;

        let artifact = Artifact {
            label: task.label().to_string(),
            task,
            body,
            backend,
            created_at: Local::now(),
        };
        self.artifacts.push(artifact.clone());

        Ok(artifact)
    }
}
