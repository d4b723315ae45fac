use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::traits::GenerationBackend;
use super::types::GenerationOptions;
use crate::app::RemoteConfig;
use crate::utils::{StudyError, StudyResult};

/// Hosted OpenAI-compatible completion endpoint.
///
/// Single call per request, no streaming, no retries. The client timeout bounds
/// how long a hung connection can block a study action.
pub struct CompletionModel {
    client: Client,
    base_url: String,
    model_name: String,
}

impl CompletionModel {
    pub fn new(config: &RemoteConfig) -> StudyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(StudyError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.model.clone(),
        })
    }
}

/// Completion token cap derived from the gateway's length budget
pub fn token_budget(max_length: usize) -> usize {
    (max_length / 2).max(1)
}

fn completion_body(model: &str, prompt: &str, max_length: usize) -> Value {
    json!({
        "model": model,
        "prompt": prompt,
        "max_tokens": token_budget(max_length),
    })
}

/// First candidate's text, trimmed
fn first_choice(response: CompletionResponse) -> StudyResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.text.trim().to_string())
        .ok_or_else(|| StudyError::backend("Completion API returned no choices"))
}

#[async_trait]
impl GenerationBackend for CompletionModel {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> StudyResult<String> {
        let api_key = options
            .api_key
            .as_deref()
            .ok_or_else(|| StudyError::backend("No API key for the remote backend"))?;

        debug!(
            model = %self.model_name,
            max_tokens = token_budget(options.max_length),
            "remote completion"
        );

        let response = self
            .client
            .post(format!("{}/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&completion_body(&self.model_name, prompt, options.max_length))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StudyError::backend(format!(
                "credential rejected by {} ({})",
                self.base_url, status
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StudyError::backend(format!(
                "Completion API error {}: {}",
                status, error_text
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| StudyError::backend(format!("Unreadable completion response: {}", e)))?;

        first_choice(body)
    }

    fn name(&self) -> &str {
        &self.model_name
    }

    fn is_local(&self) -> bool {
        false
    }
}

// Response structures (OpenAI completions format)

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_budget_is_half_the_length() {
        assert_eq!(token_budget(300), 150);
        assert_eq!(token_budget(801), 400);
        assert_eq!(token_budget(1), 1);
        assert_eq!(token_budget(0), 1);
    }

    #[test]
    fn test_completion_body() {
        let body = completion_body("gpt-3.5-turbo-instruct", "Summarize", 700);
        assert_eq!(body["model"], "gpt-3.5-turbo-instruct");
        assert_eq!(body["prompt"], "Summarize");
        assert_eq!(body["max_tokens"], 350);
    }

    #[test]
    fn test_first_choice_is_trimmed() {
        let response: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"text":"\n\n  Light becomes sugar.  \n"},{"text":"other"}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(response).unwrap(), "Light becomes sugar.");
    }

    #[test]
    fn test_no_choices_is_backend_unavailable() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_choice(response),
            Err(StudyError::BackendUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let model = CompletionModel::new(&RemoteConfig::default()).unwrap();
        let result = model.generate("hi", &GenerationOptions::new(10)).await;
        assert!(matches!(result, Err(StudyError::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_backend_unavailable() {
        let config = RemoteConfig {
            base_url: "http://127.0.0.1:9/v1".to_string(),
            timeout_secs: 2,
            ..RemoteConfig::default()
        };
        let model = CompletionModel::new(&config).unwrap();
        let result = model
            .generate("hi", &GenerationOptions::new(10).with_api_key("sk-test"))
            .await;
        assert!(matches!(result, Err(StudyError::BackendUnavailable(_))));
    }
}
