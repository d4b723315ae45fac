// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod factory;
mod gateway;
mod local;
mod remote;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use factory::ModelFactory;
pub use gateway::Gateway;
pub use local::OllamaModel;
pub use remote::{token_budget, CompletionModel};
pub use traits::GenerationBackend;
pub use types::{BackendKind, GenerationOptions, PromptStyle, SessionConfig};

#[cfg(test)]
pub(crate) use gateway::testing;
