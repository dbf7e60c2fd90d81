//! OpenAI-compatible generation backend.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! The plan schema is attached as a `json_schema` response format.

use crate::domain::GenerationFailure;
use crate::ports::{GenerationBackend, GenerationRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const SCHEMA_NAME: &str = "weekly_meal_plan";

/// OpenAI-compatible generation adapter.
///
/// Can be configured to work with:
/// - OpenAI API (api.openai.com)
/// - Azure OpenAI
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-4o-mini", "llama3.2")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    fn is_local(&self) -> bool {
        self.api_url.contains("localhost") || self.api_url.contains("127.0.0.1")
    }

    fn build_body(&self, request: &GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system_instruction.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            temperature: request.temperature,
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: SCHEMA_NAME.to_string(),
                    schema: request.schema.to_json_schema(),
                    strict: false,
                },
            },
        }
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    schema: Value,
    strict: bool,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[async_trait::async_trait]
impl GenerationBackend for OpenAiAdapter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate_json(&self, request: &GenerationRequest) -> Result<String, GenerationFailure> {
        if self.api_key.is_empty() && !self.is_local() {
            return Err(GenerationFailure::BackendUnavailable(
                "MEAL_PLANNER_AI_API_KEY is not set".to_string(),
            ));
        }

        info!(model = %self.model, url = %self.api_url, "sending plan request to OpenAI-compatible API");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| GenerationFailure::BackendCallFailed(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(GenerationFailure::BackendCallFailed(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            GenerationFailure::BackendCallFailed(format!("Failed to parse API response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(GenerationFailure::EmptyPlan)?;

        debug!(raw_len = content.len(), "received AI response");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan_schema;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_instruction: "plan meals".to_string(),
            prompt: "no nuts".to_string(),
            schema: plan_schema(5),
            temperature: 0.7,
        }
    }

    #[test]
    fn test_body_carries_schema_and_messages() {
        let adapter = OpenAiAdapter::new(
            DEFAULT_OPENAI_URL.to_string(),
            "key".to_string(),
            "gpt-4o-mini".to_string(),
        );
        let body = serde_json::to_value(adapter.build_body(&request())).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "no nuts");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["schema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let adapter = OpenAiAdapter::new(
            DEFAULT_OPENAI_URL.to_string(),
            String::new(),
            "gpt-4o-mini".to_string(),
        );
        let err = adapter.generate_json(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationFailure::BackendUnavailable(_)));
    }

    #[test]
    fn test_local_endpoint_needs_no_key() {
        let adapter = OpenAiAdapter::new(
            "http://localhost:11434/v1/chat/completions".to_string(),
            String::new(),
            "llama3.2".to_string(),
        );
        assert!(adapter.is_local());
    }
}
