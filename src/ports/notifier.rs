//! Notification outbound port. Deliver a finished plan to an external channel.

use crate::domain::{DomainError, GroupedShoppingList, WeeklyPlan};

/// Port for delivering a generated plan (email, chat messaging, ...).
///
/// Only ever called with a real plan; a generation failure never reaches a notifier.
#[async_trait::async_trait]
pub trait NotifierPort: Send + Sync {
    /// Channel label for logs and delivery reports.
    fn name(&self) -> &str;

    /// Render and send the plan.
    ///
    /// # Errors
    /// Returns `DomainError::Delivery` if the channel rejects the message.
    async fn deliver(
        &self,
        plan: &WeeklyPlan,
        shopping_list: &GroupedShoppingList,
    ) -> Result<(), DomainError>;
}
