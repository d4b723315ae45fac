use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::traits::GenerationBackend;
use super::types::{BackendKind, GenerationOptions, SessionConfig};
use crate::utils::{StudyError, StudyResult};

/// Single entry point for text generation.
///
/// Picks a backend per call from the caller's [`SessionConfig`], applies the
/// prompt style, and lazily prepares the local model exactly once.
pub struct Gateway {
    local: Arc<dyn GenerationBackend>,
    remote: Arc<dyn GenerationBackend>,
    local_ready: OnceCell<()>,
}

impl Gateway {
    pub fn new(local: Arc<dyn GenerationBackend>, remote: Arc<dyn GenerationBackend>) -> Self {
        Self {
            local,
            remote,
            local_ready: OnceCell::new(),
        }
    }

    /// Generate text for `instruction` with at most roughly `max_length` output.
    ///
    /// Fails with [`StudyError::MissingInput`] on a blank instruction before
    /// touching any backend.
    pub async fn generate(
        &self,
        session: &SessionConfig,
        instruction: &str,
        max_length: usize,
    ) -> StudyResult<String> {
        if instruction.trim().is_empty() {
            return Err(StudyError::missing("instruction is empty"));
        }

        let prompt = session.style.apply(instruction);

        match session.effective_backend() {
            BackendKind::Remote => {
                let mut options = GenerationOptions::new(max_length);
                if let Some(key) = session.credential() {
                    options = options.with_api_key(key);
                }
                debug!(model = self.remote.name(), "dispatching to remote backend");
                self.remote.generate(&prompt, &options).await
            }
            BackendKind::Local => {
                if session.backend == BackendKind::Remote {
                    info!("Remote backend selected without an API key, using local model");
                }
                self.ensure_local().await?;
                debug!(model = self.local.name(), "dispatching to local backend");
                self.local
                    .generate(&prompt, &GenerationOptions::new(max_length))
                    .await
            }
        }
    }

    /// Prepare the local model once. A failed attempt leaves it unprepared
    /// so the next request can try again.
    async fn ensure_local(&self) -> StudyResult<()> {
        self.local_ready
            .get_or_try_init(|| async { self.local.prepare().await })
            .await
            .map(|_| ())
    }

    /// Whether the local model has been prepared
    pub fn is_local_ready(&self) -> bool {
        self.local_ready.initialized()
    }

    fn backend(&self, kind: BackendKind) -> &dyn GenerationBackend {
        match kind {
            BackendKind::Local => self.local.as_ref(),
            BackendKind::Remote => self.remote.as_ref(),
        }
    }

    /// Model name behind a backend kind
    pub fn model_name(&self, kind: BackendKind) -> &str {
        self.backend(kind).name()
    }

    /// Model name plus where it runs, for status lines
    pub fn describe(&self, kind: BackendKind) -> String {
        let backend = self.backend(kind);
        let place = if backend.is_local() {
            "on this machine"
        } else {
            "hosted"
        };
        format!("{} ({})", backend.name(), place)
    }

    /// Check reachability of a backend
    pub async fn validate(&self, kind: BackendKind) -> bool {
        self.backend(kind).validate_connection().await
    }
}
