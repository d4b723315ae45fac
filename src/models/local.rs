use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::traits::GenerationBackend;
use super::types::GenerationOptions;
use crate::app::LocalConfig;
use crate::constants::HTTP_REQUEST_TIMEOUT_SECS;
use crate::ollama;
use crate::utils::{StudyError, StudyResult};

/// Local model served by an Ollama daemon, decoded greedily
pub struct OllamaModel {
    client: Client,
    base_url: String,
    model_name: String,
    auto_pull: bool,
}

impl OllamaModel {
    pub fn new(config: &LocalConfig) -> StudyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(StudyError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            model_name: config.model.clone(),
            auto_pull: config.auto_pull,
        })
    }

    fn request_body(&self, prompt: &str, max_length: usize) -> Value {
        generate_body(&self.model_name, prompt, max_length)
    }
}

/// Non-streaming, deterministic generate request
fn generate_body(model: &str, prompt: &str, max_length: usize) -> Value {
    json!({
        "model": model,
        "prompt": prompt,
        "stream": false,
        "options": {
            "temperature": 0.0,
            "top_k": 1,
            "num_predict": max_length,
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl GenerationBackend for OllamaModel {
    async fn prepare(&self) -> StudyResult<()> {
        info!(
            "Loading local model {} (one-time). First use may download weights.",
            self.model_name
        );

        ollama::ensure_model(&self.client, &self.base_url, &self.model_name, self.auto_pull)
            .await?;

        // A generate call without a prompt loads the weights into memory
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&json!({ "model": self.model_name }))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StudyError::backend(format!(
                "Failed to load {}: {}",
                self.model_name, error_text
            )));
        }

        info!("Local model {} ready", self.model_name);
        Ok(())
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> StudyResult<String> {
        debug!(
            model = %self.model_name,
            max_length = options.max_length,
            "local generate"
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&self.request_body(prompt, options.max_length))
            .send()
            .await
            .map_err(|e| {
                StudyError::backend(format!(
                    "Failed to reach Ollama at {}: {}",
                    self.base_url, e
                ))
            })?;

        let status = response.status();
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| StudyError::backend(format!("Unreadable Ollama response: {}", e)))?;

        if let Some(error) = body.error {
            return Err(StudyError::backend(format!("Ollama error: {}", error)));
        }
        if !status.is_success() {
            return Err(StudyError::backend(format!("Ollama returned {}", status)));
        }

        Ok(body.response.trim().to_string())
    }

    fn name(&self) -> &str {
        &self.model_name
    }

    fn is_local(&self) -> bool {
        true
    }

    async fn validate_connection(&self) -> bool {
        ollama::is_running(&self.base_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_body_is_deterministic_and_capped() {
        let body = generate_body("tinyllama", "Explain gravity", 300);

        assert_eq!(body["model"], "tinyllama");
        assert_eq!(body["prompt"], "Explain gravity");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["temperature"], 0.0);
        assert_eq!(body["options"]["top_k"], 1);
        assert_eq!(body["options"]["num_predict"], 300);
    }

    #[test]
    fn test_error_response_parses() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"error":"model 'x' not found"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("model 'x' not found"));
        assert!(body.response.is_empty());
    }

    #[test]
    fn test_base_url_from_config() {
        let model = OllamaModel::new(&LocalConfig::default()).unwrap();
        assert_eq!(model.base_url, "http://localhost:11434");
        assert_eq!(model.name(), "tinyllama");
        assert!(model.is_local());
    }
}
