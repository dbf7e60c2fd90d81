//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: UI/CLI invokes application use cases.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Collect preferences (if not given up front), generate, show and deliver the plan.
    async fn run(&self) -> Result<(), DomainError>;
}
