//! HTTP client for a local Ollama server.

use crate::error::{LlmError, Result};
use lotlift_core::OllamaConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Client for the Ollama HTTP API.
///
/// Requests are never retried; failures carry the server's own message so
/// the user sees what actually went wrong.
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client from settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// List the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        debug!(url = %self.base_url, "listing Ollama models");
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;
        let tags: TagsResponse = Self::parse_json(response).await?;
        Ok(tags.models)
    }

    /// Generate a completion for `prompt` using `model`.
    ///
    /// The call blocks until the server finishes; generation on CPU can
    /// take a while, which is what the configured timeout is for.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        debug!(model, prompt_len = prompt.len(), "requesting completion");
        let request = GenerateRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
        };
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;
        let body: GenerateResponse = Self::parse_json(response).await?;
        Ok(body.response)
    }

    /// Pull a model onto the server by name, blocking until the pull
    /// completes.
    pub async fn pull_model(&self, name: &str) -> Result<()> {
        debug!(name, "pulling model");
        let request = PullRequest {
            name: name.to_string(),
            stream: false,
        };
        let response = self
            .client
            .post(format!("{}/api/pull", self.base_url))
            .json(&request)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

/// An installed model as reported by `/api/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name, e.g. "llama3.1:8b"
    pub name: String,
    /// On-disk size in bytes
    #[serde(default)]
    pub size: u64,
}

impl ModelInfo {
    /// Picker label in the form "name (sizeGB)".
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({:.1}GB)", self.name, self.size as f64 / 1e9)
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct PullRequest {
    name: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::new(&OllamaConfig::default()).expect("create client");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = OllamaConfig {
            url: "http://192.168.1.20:11434/".to_string(),
            ..OllamaConfig::default()
        };
        let client = OllamaClient::new(&config).expect("create client");
        assert_eq!(client.base_url, "http://192.168.1.20:11434");
    }

    #[test]
    fn test_generate_request_shape() {
        let request = GenerateRequest {
            model: "llama3.1:8b".to_string(),
            prompt: "Describe this vehicle".to_string(),
            stream: false,
        };
        let value = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(
            value,
            serde_json::json!({
                "model": "llama3.1:8b",
                "prompt": "Describe this vehicle",
                "stream": false,
            })
        );
    }

    #[test]
    fn test_pull_request_shape() {
        let request = PullRequest {
            name: "llama3.2".to_string(),
            stream: false,
        };
        let value = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(
            value,
            serde_json::json!({ "name": "llama3.2", "stream": false })
        );
    }

    #[test]
    fn test_tags_response_parse() {
        let body = r#"{"models":[{"name":"llama3.1:8b","size":4920000000,"digest":"abc"}]}"#;
        let tags: TagsResponse = serde_json::from_str(body).expect("parse tags");
        assert_eq!(tags.models.len(), 1);
        assert_eq!(tags.models[0].name, "llama3.1:8b");
        assert_eq!(tags.models[0].size, 4_920_000_000);
    }

    #[test]
    fn test_tags_response_missing_models() {
        let tags: TagsResponse = serde_json::from_str("{}").expect("parse empty tags");
        assert!(tags.models.is_empty());
    }

    #[test]
    fn test_generate_response_parse() {
        let body = r#"{"model":"llama3.1:8b","response":"A great car.","done":true}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).expect("parse response");
        assert_eq!(parsed.response, "A great car.");
    }

    #[test]
    fn test_model_label() {
        let model = ModelInfo {
            name: "llama3.1:8b".to_string(),
            size: 4_920_000_000,
        };
        assert_eq!(model.label(), "llama3.1:8b (4.9GB)");

        let small = ModelInfo {
            name: "tinyllama".to_string(),
            size: 815_000_000,
        };
        assert_eq!(small.label(), "tinyllama (0.8GB)");
    }
}
