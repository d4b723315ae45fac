/// Ollama integration module - Gateway
mod detector;
mod guide;
mod installer;

pub use detector::{has_model, is_installed, is_running, list_models};
pub use guide::install_guide;
pub use installer::{ensure_model, install_model};
