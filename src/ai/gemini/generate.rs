use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, Part};
use crate::ai::GenerationService;
use crate::models::Config;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// `generateContent` client for single-turn text and media prompts.
pub struct GeminiClient {
    http: GeminiHttpClient,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    /// Build a client from the provider settings in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: GeminiHttpClient::new(
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
            )
            .with_base_url(config.gemini_base_url.clone())
            .with_timeout(config.gemini_timeout),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<Value> {
        tracing::debug!(
            "Sending {} content part(s) to Gemini model {}",
            parts.len(),
            self.http.model()
        );

        let request = GenerateContentRequest {
            contents: vec![Content::user(parts)],
        };

        self.http.generate_content(&request).await
    }
}
