use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MYTHIC_PREFIX;

/// Which generation provider handles a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Locally hosted model (Ollama)
    #[default]
    Local,
    /// Hosted completion API
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

/// Whether instructions get the decorative Hermes prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    Plain,
    #[default]
    Prefixed,
}

impl PromptStyle {
    /// Apply the style to an instruction
    pub fn apply(self, instruction: &str) -> String {
        match self {
            PromptStyle::Plain => instruction.to_string(),
            PromptStyle::Prefixed => format!("{}{}", MYTHIC_PREFIX, instruction),
        }
    }
}

/// Per-session backend configuration, passed to the gateway on every call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub backend: BackendKind,
    pub api_key: Option<String>,
    pub style: PromptStyle,
}

impl SessionConfig {
    /// The backend a request will actually go to.
    ///
    /// Remote only when it is selected and a non-blank credential is present.
    pub fn effective_backend(&self) -> BackendKind {
        match (self.backend, self.credential()) {
            (BackendKind::Remote, Some(_)) => BackendKind::Remote,
            _ => BackendKind::Local,
        }
    }

    /// Non-blank API key, if any
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Options handed to a backend for a single generation
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Advisory cap on output size
    pub max_length: usize,
    /// Credential for backends that need one
    pub api_key: Option<String>,
}

impl GenerationOptions {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_needs_credential() {
        let mut config = SessionConfig {
            backend: BackendKind::Remote,
            api_key: None,
            style: PromptStyle::Plain,
        };
        assert_eq!(config.effective_backend(), BackendKind::Local);

        config.api_key = Some("  ".to_string());
        assert_eq!(config.effective_backend(), BackendKind::Local);

        config.api_key = Some("sk-live".to_string());
        assert_eq!(config.effective_backend(), BackendKind::Remote);
    }

    #[test]
    fn test_local_ignores_credential() {
        let config = SessionConfig {
            backend: BackendKind::Local,
            api_key: Some("sk-live".to_string()),
            style: PromptStyle::Plain,
        };
        assert_eq!(config.effective_backend(), BackendKind::Local);
    }

    #[test]
    fn test_prefix_style() {
        assert_eq!(PromptStyle::Plain.apply("hi"), "hi");
        assert_eq!(
            PromptStyle::Prefixed.apply("hi"),
            "Ancient scholar Hermes whispers: hi"
        );
    }
}
