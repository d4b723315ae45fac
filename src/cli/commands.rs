use anyhow::Result;
use colored::Colorize;

use crate::{
    app::{get_config_dir, init_config, Config},
    models::{BackendKind, ModelFactory},
    ollama::{has_model, is_installed as is_ollama_installed, list_models},
};

use super::Commands;

/// Handle housekeeping subcommands. Returns false for study commands,
/// which the runtime handles.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            let path = init_config()?;
            println!("Configuration ready at: {}", path.display());
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Show version information
pub fn show_version() {
    println!("turbo-study v{}", env!("CARGO_PKG_VERSION"));
    println!("   Summaries, explanations, flashcards and quizzes from your notes");
}

/// What happens about a local model that is not installed yet
fn missing_model_hint(model: &str, auto_pull: bool) -> String {
    if auto_pull {
        format!("model {} will be pulled on first use", model)
    } else {
        format!("model {} not installed, run: ollama pull {}", model, model)
    }
}

/// Show status of backends and configuration
async fn show_status(config: &Config) -> Result<()> {
    println!("turbo-study status:");
    println!();
    println!("  Default backend: {}", config.backend.kind.to_string().cyan());

    let gateway = ModelFactory::gateway(config)?;

    // Local backend
    let base_url = config.local.base_url();
    if !is_ollama_installed() {
        println!("  {} Ollama: not installed", "[ERROR]".red());
    } else if !gateway.validate(BackendKind::Local).await {
        println!(
            "  {} Ollama: installed but not running at {} (try: ollama serve)",
            "[WARNING]".yellow(),
            base_url
        );
    } else {
        let client = reqwest::Client::new();
        let models = list_models(&client, &base_url).await.unwrap_or_default();
        if has_model(&models, &config.local.model) {
            println!(
                "  {} Ollama: running, model {} installed",
                "[OK]".green(),
                gateway.describe(BackendKind::Local)
            );
        } else {
            println!(
                "  {} Ollama: running, {}",
                "[WARNING]".yellow(),
                missing_model_hint(&config.local.model, config.local.auto_pull)
            );
        }
    }

    // Remote backend
    if config.remote.resolve_api_key().is_some() {
        println!(
            "  {} Remote: {} via {} (key set)",
            "[OK]".green(),
            gateway.describe(BackendKind::Remote),
            config.remote.base_url
        );
    } else {
        println!(
            "  {} Remote: no API key ({} unset); requests fall back to local",
            "[WARNING]".yellow(),
            config.remote.api_key_env
        );
    }

    // Configuration
    let config_path = get_config_dir()?.join("config.toml");
    if config_path.exists() {
        println!("  {} Configuration: {}", "[OK]".green(), config_path.display());
    } else {
        println!("  {} Configuration: not found (using defaults, run `turbo-study init`)", "[WARNING]".yellow());
    }

    println!();
    Ok(())
}
