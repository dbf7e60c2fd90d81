//! Gemini generation backend (Generative Language REST API).
//!
//! Uses `generateContent` with `responseMimeType: application/json` and the
//! plan schema rendered as Gemini `responseSchema`.

use crate::domain::GenerationFailure;
use crate::ports::{GenerationBackend, GenerationRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini adapter. One `generateContent` call per request.
pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiAdapter {
    /// # Arguments
    /// * `base_url` - API root, e.g. "https://generativelanguage.googleapis.com/v1beta"
    /// * `api_key` - Gemini API key; empty means unconfigured
    /// * `model` - Model name, e.g. "gemini-2.5-flash"
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.schema.to_gemini_schema(),
                temperature: request.temperature,
            },
        }
    }

    /// Concatenated text of the first candidate.
    fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationFailure> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GenerationFailure::BackendCallFailed(format!(
                "prompt blocked: {}",
                reason
            )));
        }
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerationFailure::EmptyPlan)?;
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GenerationFailure::EmptyPlan);
        }
        Ok(text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[async_trait::async_trait]
impl GenerationBackend for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_json(&self, request: &GenerationRequest) -> Result<String, GenerationFailure> {
        if self.api_key.is_empty() {
            return Err(GenerationFailure::BackendUnavailable(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        info!(model = %self.model, "calling Gemini API to generate meal plan");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| GenerationFailure::BackendCallFailed(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Gemini API returned error");
            return Err(GenerationFailure::BackendCallFailed(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            GenerationFailure::BackendCallFailed(format!("Failed to parse API response: {}", e))
        })?;

        let text = Self::extract_text(body)?;
        debug!(raw_len = text.len(), "received Gemini response");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan_schema;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_instruction: "plan meals".to_string(),
            prompt: "no pork".to_string(),
            schema: plan_schema(5),
            temperature: 0.7,
        }
    }

    #[test]
    fn test_endpoint() {
        let adapter = GeminiAdapter::new(
            format!("{}/", DEFAULT_GEMINI_URL),
            "k".to_string(),
            DEFAULT_GEMINI_MODEL.to_string(),
        );
        assert_eq!(
            adapter.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_body_shape() {
        let body = serde_json::to_value(GeminiAdapter::build_body(&request())).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "plan meals");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "no pork");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let raw = r#"{"candidates": [{"content": {"role": "model",
                       "parts": [{"text": "{\"Monday\""}, {"text": ": {}}"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(GeminiAdapter::extract_text(response).unwrap(), r#"{"Monday": {}}"#);
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let err = GeminiAdapter::extract_text(response).unwrap_err();
        assert!(matches!(err, GenerationFailure::BackendCallFailed(_)));
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(
            GeminiAdapter::extract_text(response).unwrap_err(),
            GenerationFailure::EmptyPlan
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let adapter = GeminiAdapter::new(
            DEFAULT_GEMINI_URL.to_string(),
            String::new(),
            DEFAULT_GEMINI_MODEL.to_string(),
        );
        let err = adapter.generate_json(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationFailure::BackendUnavailable(_)));
    }
}
