/// Runtime orchestrator module - Gateway

mod focus;
mod interactive;
mod non_interactive;
mod orchestrator;

pub use focus::run_phase;
pub use interactive::StudyShell;
pub use non_interactive::{format_artifact, NonInteractiveRunner};
pub use orchestrator::Orchestrator;
