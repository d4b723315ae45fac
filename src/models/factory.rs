use std::sync::Arc;

use super::gateway::Gateway;
use super::local::OllamaModel;
use super::remote::CompletionModel;
use super::traits::GenerationBackend;
use super::types::BackendKind;
use crate::app::Config;
use crate::utils::StudyResult;

/// Factory for creating backends and the gateway from configuration
pub struct ModelFactory;

impl ModelFactory {
    /// Create one backend. Construction is cheap; no network I/O happens here.
    pub fn create(kind: BackendKind, config: &Config) -> StudyResult<Arc<dyn GenerationBackend>> {
        let backend: Arc<dyn GenerationBackend> = match kind {
            BackendKind::Local => Arc::new(OllamaModel::new(&config.local)?),
            BackendKind::Remote => Arc::new(CompletionModel::new(&config.remote)?),
        };
        Ok(backend)
    }

    /// Create a gateway wired to both configured backends
    pub fn gateway(config: &Config) -> StudyResult<Gateway> {
        Ok(Gateway::new(
            Self::create(BackendKind::Local, config)?,
            Self::create(BackendKind::Remote, config)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_reports_locality() {
        let config = Config::default();
        let local = ModelFactory::create(BackendKind::Local, &config).unwrap();
        let remote = ModelFactory::create(BackendKind::Remote, &config).unwrap();

        assert!(local.is_local());
        assert!(!remote.is_local());
        assert_eq!(remote.name(), config.remote.model);
    }

    #[test]
    fn test_gateway_starts_unprepared() {
        let gateway = ModelFactory::gateway(&Config::default()).unwrap();
        assert!(!gateway.is_local_ready());
        assert_eq!(gateway.model_name(BackendKind::Local), "tinyllama");
    }
}
