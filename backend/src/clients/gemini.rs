//! Generative language client used by the suggestion flows.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// JSON schema the answer must follow; sent to the model as a hint
    pub response_schema: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum LanguageModelError {
    #[error("language model request failed: {0}")]
    Request(String),
    #[error("language model returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("language model returned no text")]
    EmptyResponse,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a single text answer for the prompt
    async fn generate(&self, request: GenerationRequest) -> Result<String, LanguageModelError>;
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(request: &GenerationRequest) -> Value {
        let mut generation_config = json!({ "responseMimeType": "application/json" });
        if let Some(schema) = &request.response_schema {
            generation_config["responseJsonSchema"] = schema.clone();
        }
        json!({
            "contents": [
                { "role": "user", "parts": [ { "text": request.prompt } ] }
            ],
            "generationConfig": generation_config,
        })
    }

    fn extract_text(body: GenerateContentResponse) -> Result<String, LanguageModelError> {
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            Err(LanguageModelError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LanguageModelError> {
        debug!("Calling model {} ({} prompt chars)", self.model, request.prompt.len());
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(&request))
            .send()
            .await
            .map_err(|e| LanguageModelError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Model {} returned {}: {}", self.model, status, message);
            return Err(LanguageModelError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LanguageModelError::Request(e.to_string()))?;
        Self::extract_text(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_uses_json_mode() {
        let body = GeminiClient::request_body(&GenerationRequest {
            prompt: "hello".to_string(),
            response_schema: Some(json!({"type": "object"})),
        });
        assert_eq!(body["contents"][0]["parts"][0]["text"], json!("hello"));
        assert_eq!(body["generationConfig"]["responseMimeType"], json!("application/json"));
        assert_eq!(body["generationConfig"]["responseJsonSchema"], json!({"type": "object"}));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "{\"sugg" }, { "text": "estions\": []}" } ] } }
            ]
        }))
        .unwrap();
        assert_eq!(GeminiClient::extract_text(body).unwrap(), "{\"suggestions\": []}");
    }

    #[test]
    fn test_extract_text_empty_is_error() {
        let body: GenerateContentResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(GeminiClient::extract_text(body), Err(LanguageModelError::EmptyResponse)));
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(reqwest::Client::new(), "https://llm.example/v1beta/", "m", "k");
        assert_eq!(client.endpoint(), "https://llm.example/v1beta/models/m:generateContent");
    }
}
