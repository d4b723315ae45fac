use thiserror::Error;

/// Main error type for turbo-study
#[derive(Error, Debug)]
pub enum StudyError {
    /// Document content could not be decoded
    #[error("Could not parse document: {0}")]
    ParseFailure(String),

    /// The local model failed to load/run, or the remote call failed or was rejected
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// An action needing source text or a query was invoked without one
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StudyError {
    pub fn backend(message: impl std::fmt::Display) -> Self {
        Self::BackendUnavailable(message.to_string())
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingInput(message.into())
    }
}

impl From<reqwest::Error> for StudyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::BackendUnavailable(format!("request timed out: {}", err))
        } else {
            Self::BackendUnavailable(err.to_string())
        }
    }
}

pub type StudyResult<T> = std::result::Result<T, StudyError>;
