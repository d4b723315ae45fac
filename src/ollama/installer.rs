use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::info;

use super::detector;
use super::guide;
use crate::constants::MODEL_PULL_TIMEOUT_SECS;
use crate::utils::{StudyError, StudyResult};

#[derive(Debug, Deserialize)]
struct PullResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error: Option<String>,
}

/// Pull an Ollama model through the daemon's HTTP API
pub async fn install_model(client: &Client, base_url: &str, model: &str) -> StudyResult<()> {
    info!("[DOWNLOADING] Pulling {} model (one-time)...", model);

    let response = client
        .post(format!("{}/api/pull", base_url))
        .timeout(Duration::from_secs(MODEL_PULL_TIMEOUT_SECS))
        .json(&json!({ "model": model, "stream": false }))
        .send()
        .await?;

    let status = response.status();
    let body: PullResponse = response
        .json()
        .await
        .map_err(|e| StudyError::backend(format!("Unreadable pull response: {}", e)))?;

    if let Some(error) = body.error {
        return Err(StudyError::backend(format!(
            "Failed to pull {}: {}",
            model, error
        )));
    }
    if !status.is_success() || body.status != "success" {
        return Err(StudyError::backend(format!(
            "Failed to pull {} (status {}, {})",
            model, status, body.status
        )));
    }

    info!("[OK] {} installed", model);
    Ok(())
}

/// Ensure the model is available in the daemon, pulling it if allowed
pub async fn ensure_model(
    client: &Client,
    base_url: &str,
    model: &str,
    auto_pull: bool,
) -> StudyResult<()> {
    let models = match detector::list_models(client, base_url).await {
        Ok(models) => models,
        Err(e) if !detector::is_installed() => {
            return Err(StudyError::backend(format!(
                "{}\n\n{}",
                e,
                guide::install_guide()
            )));
        }
        Err(e) => return Err(e),
    };

    if detector::has_model(&models, model) {
        return Ok(());
    }

    if !auto_pull {
        return Err(StudyError::backend(format!(
            "Model '{}' not found locally. Run: ollama pull {}",
            model, model
        )));
    }

    install_model(client, base_url, model).await
}
