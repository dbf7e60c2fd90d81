//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{GenerationFailure, SchemaNode};

/// Everything a backend needs for one structured generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub prompt: String,
    /// Output constraint; adapters render it in their own schema dialect.
    pub schema: SchemaNode,
    pub temperature: f32,
}

/// Text-generation backend. One call per request, no retries.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short backend label for logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Issue the request and return the raw text payload (expected to be JSON).
    ///
    /// Adapters map missing credentials to `BackendUnavailable` and transport,
    /// auth or quota errors to `BackendCallFailed`. Parsing is the caller's job.
    async fn generate_json(&self, request: &GenerationRequest) -> Result<String, GenerationFailure>;
}
