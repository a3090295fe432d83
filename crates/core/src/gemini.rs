use crate::config::GeminiConfig;
use crate::error::BackendError;
use crate::prompt::Prompt;
use crate::traits::ChatModel;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const GENERATION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

const TEMPERATURE: f64 = 0.2;
const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Client for the hosted Gemini chat-completion API.
pub struct GeminiModel {
    config: GeminiConfig,
    client: Client,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl ChatModel for GeminiModel {
    async fn generate(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let response = self
            .client
            .post(format!(
                "{GENERATION_ENDPOINT}/models/{}:generateContent",
                self.config.model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&json!({
                "system_instruction": {
                    "parts": [{ "text": prompt.system }]
                },
                "contents": [
                    { "role": "user", "parts": [{ "text": prompt.user }] }
                ],
                "generationConfig": {
                    "temperature": TEMPERATURE,
                    "maxOutputTokens": MAX_OUTPUT_TOKENS,
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::BackendResponse {
                backend: "gemini".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        extract_candidate_text(&parsed).ok_or_else(|| BackendError::BackendResponse {
            backend: "gemini".to_string(),
            details: "response missing candidate text".to_string(),
        })
    }
}

fn extract_candidate_text(value: &Value) -> Option<String> {
    value
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}
