//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

/// Why no plan is available. Callers must treat every variant as "no plan".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    /// Missing credential or backend configuration.
    #[error("generation backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Network, auth, quota or non-success response from the backend.
    #[error("generation backend call failed: {0}")]
    BackendCallFailed(String),

    /// Payload did not parse into a complete weekly plan.
    #[error("malformed plan response: {0}")]
    MalformedResponse(String),

    #[error("generation backend returned an empty plan")]
    EmptyPlan,
}

/// Flat discriminant of `GenerationFailure`, for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BackendUnavailable,
    BackendCallFailed,
    MalformedResponse,
    EmptyPlan,
}

impl GenerationFailure {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationFailure::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            GenerationFailure::BackendCallFailed(_) => ErrorKind::BackendCallFailed,
            GenerationFailure::MalformedResponse(_) => ErrorKind::MalformedResponse,
            GenerationFailure::EmptyPlan => ErrorKind::EmptyPlan,
        }
    }
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    #[error("Delivery via {channel} failed: {reason}")]
    Delivery { channel: String, reason: String },

    #[error("Input error: {0}")]
    Input(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn delivery(channel: &str, reason: impl Into<String>) -> Self {
        DomainError::Delivery {
            channel: channel.to_string(),
            reason: reason.into(),
        }
    }
}
