//! AI adapter module. Implements GenerationBackend for LLM integration.
//!
//! Provides Gemini and OpenAI-compatible adapters and a mock adapter for testing.

pub mod gemini_adapter;
pub mod mock_adapter;
pub mod openai_adapter;

pub use gemini_adapter::GeminiAdapter;
pub use mock_adapter::MockGenerationBackend;
pub use openai_adapter::OpenAiAdapter;
