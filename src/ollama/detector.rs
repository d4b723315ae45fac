use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::constants::HEALTH_CHECK_TIMEOUT_MS;
use crate::utils::{StudyError, StudyResult};

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Check if the Ollama binary is installed on the system
pub fn is_installed() -> bool {
    which::which("ollama").is_ok()
}

/// Check if an Ollama daemon answers at `base_url`
pub async fn is_running(base_url: &str) -> bool {
    let client = match Client::builder()
        .timeout(Duration::from_millis(HEALTH_CHECK_TIMEOUT_MS))
        .build()
    {
        Ok(client) => client,
        Err(_) => return false,
    };

    match client.get(format!("{}/api/tags", base_url)).send().await {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}

/// Get list of models installed in the daemon
pub async fn list_models(client: &Client, base_url: &str) -> StudyResult<Vec<String>> {
    let response = client
        .get(format!("{}/api/tags", base_url))
        .send()
        .await
        .map_err(|e| {
            StudyError::backend(format!("Ollama is not reachable at {}: {}", base_url, e))
        })?;

    if !response.status().is_success() {
        return Err(StudyError::backend(format!(
            "Ollama returned {} listing models",
            response.status()
        )));
    }

    let tags: TagsResponse = response.json().await?;
    Ok(tags.models.into_iter().map(|m| m.name).collect())
}

/// Whether `model` is among `installed`; an untagged name matches any tag
pub fn has_model(installed: &[String], model: &str) -> bool {
    installed.iter().any(|name| {
        name == model
            || (!model.contains(':')
                && name
                    .strip_prefix(model)
                    .is_some_and(|rest| rest.starts_with(':')))
    })
}
