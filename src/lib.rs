pub mod app;
pub mod cli;
pub mod constants;
pub mod documents;
pub mod models;
pub mod ollama;
pub mod prompts;
pub mod runtime;
pub mod timer;
pub mod utils;

pub use app::{load_config, Config, StudySession};
pub use documents::{extract_document, extract_file};
pub use models::{Gateway, GenerationBackend, ModelFactory};
pub use prompts::StudyTask;
pub use utils::StudyError;
