use async_trait::async_trait;

use super::types::GenerationOptions;
use crate::utils::StudyResult;

/// Core trait that all generation backends must implement
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// One-time setup before the first generation (model download/load).
    ///
    /// The gateway calls this at most once per successful initialization.
    async fn prepare(&self) -> StudyResult<()> {
        Ok(())
    }

    /// Generate a single completion for `prompt`
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> StudyResult<String>;

    /// Get the name of the model
    fn name(&self) -> &str;

    /// Check if this is a local model (no API calls)
    fn is_local(&self) -> bool;

    /// Validate that the backend is reachable
    async fn validate_connection(&self) -> bool {
        true
    }
}
