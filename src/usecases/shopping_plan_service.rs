//! Shopping plan service. Orchestrates generate -> aggregate -> format -> deliver.
//!
//! Coordinates between the plan generator (backend), the pure domain
//! functions, and the configured notifiers.

use crate::domain::format::format as render_report;
use crate::domain::{DomainError, GenerationFailure, GroupedShoppingList, WeeklyPlan, aggregate};
use crate::ports::NotifierPort;
use crate::usecases::PlanGenerator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Result of one successful invocation. Built fresh per request, never stored.
#[derive(Debug, Clone)]
pub struct ShoppingPlan {
    pub plan: WeeklyPlan,
    pub shopping_list: GroupedShoppingList,
    pub formatted_text: String,
}

/// Per-channel delivery outcome.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub delivered: Vec<String>,
    pub failed: Vec<(String, DomainError)>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Service for the end-to-end shopping plan flow.
///
/// 1. Generate the weekly plan (single backend call, optional caller timeout)
/// 2. Aggregate the dish-grouped shopping list
/// 3. Render the text report
/// 4. Hand plan + list to each notifier (failures logged, not fatal)
pub struct ShoppingPlanService {
    generator: Arc<PlanGenerator>,
    notifiers: Vec<Arc<dyn NotifierPort>>,
    timeout: Option<Duration>,
}

impl ShoppingPlanService {
    /// Create a new service.
    ///
    /// # Arguments
    /// * `generator` - Plan generator bound to a backend
    /// * `notifiers` - Delivery channels (may be empty)
    pub fn new(generator: Arc<PlanGenerator>, notifiers: Vec<Arc<dyn NotifierPort>>) -> Self {
        Self {
            generator,
            notifiers,
            timeout: None,
        }
    }

    /// Bound the backend round trip. Elapsed time maps to `BackendCallFailed`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn notifier_names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Generate a plan for `preferences` and render it. No delivery.
    pub async fn produce_shopping_plan(
        &self,
        preferences: &str,
    ) -> Result<ShoppingPlan, GenerationFailure> {
        let generation = self.generator.generate(preferences);
        let plan = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, generation).await.map_err(|_| {
                warn!(timeout_secs = limit.as_secs(), "generation backend timed out");
                GenerationFailure::BackendCallFailed(format!(
                    "no response within {} seconds",
                    limit.as_secs()
                ))
            })??,
            None => generation.await?,
        };

        let shopping_list = aggregate(&plan);
        let formatted_text = render_report(&plan, &shopping_list);

        info!(
            days = plan.len(),
            dishes = shopping_list.dish_count(),
            items = shopping_list.consolidated_total().len(),
            "shopping plan ready"
        );

        Ok(ShoppingPlan {
            plan,
            shopping_list,
            formatted_text,
        })
    }

    /// Send a finished plan through every notifier.
    pub async fn deliver(&self, shopping_plan: &ShoppingPlan) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for notifier in &self.notifiers {
            match notifier
                .deliver(&shopping_plan.plan, &shopping_plan.shopping_list)
                .await
            {
                Ok(()) => {
                    info!(channel = notifier.name(), "plan delivered");
                    report.delivered.push(notifier.name().to_string());
                }
                Err(e) => {
                    warn!(channel = notifier.name(), error = %e, "delivery failed");
                    report.failed.push((notifier.name().to_string(), e));
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockGenerationBackend;
    use crate::domain::ErrorKind;
    use crate::ports::{GenerationBackend, GenerationRequest};
    use crate::usecases::MealRules;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNotifier {
        name: &'static str,
        fail: bool,
        calls: AtomicUsize,
    }

    impl CountingNotifier {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl NotifierPort for CountingNotifier {
        fn name(&self) -> &str {
            self.name
        }

        async fn deliver(
            &self,
            plan: &WeeklyPlan,
            shopping_list: &GroupedShoppingList,
        ) -> Result<(), DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(plan.len(), 7);
            assert!(!shopping_list.is_empty());
            if self.fail {
                Err(DomainError::delivery(self.name, "smtp refused"))
            } else {
                Ok(())
            }
        }
    }

    struct SlowBackend;

    #[async_trait::async_trait]
    impl GenerationBackend for SlowBackend {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate_json(&self, _request: &GenerationRequest) -> Result<String, GenerationFailure> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("{}".to_string())
        }
    }

    fn generator(backend: Arc<dyn GenerationBackend>) -> Arc<PlanGenerator> {
        Arc::new(PlanGenerator::new(backend, MealRules::default()))
    }

    #[tokio::test]
    async fn test_produce_shopping_plan() {
        let service = ShoppingPlanService::new(
            generator(Arc::new(MockGenerationBackend::with_delay(0))),
            Vec::new(),
        );

        let result = service.produce_shopping_plan("").await.unwrap();

        assert_eq!(result.plan.len(), 7);
        assert_eq!(result.shopping_list, aggregate(&result.plan));
        assert!(result.formatted_text.contains("CONSOLIDATED TOTALS"));
    }

    #[tokio::test]
    async fn test_unavailable_backend_yields_failure() {
        let service = ShoppingPlanService::new(
            generator(Arc::new(MockGenerationBackend::unavailable())),
            Vec::new(),
        );
        let err = service.produce_shopping_plan("tacos").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_call_failed() {
        let service = ShoppingPlanService::new(generator(Arc::new(SlowBackend)), Vec::new())
            .with_timeout(Duration::from_millis(20));
        let err = service.produce_shopping_plan("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendCallFailed);
    }

    #[tokio::test]
    async fn test_delivery_continues_after_failure() {
        let failing = CountingNotifier::new("email", true);
        let ok = CountingNotifier::new("whatsapp", false);
        let service = ShoppingPlanService::new(
            generator(Arc::new(MockGenerationBackend::with_delay(0))),
            vec![
                failing.clone() as Arc<dyn NotifierPort>,
                ok.clone() as Arc<dyn NotifierPort>,
            ],
        );

        let plan = service.produce_shopping_plan("").await.unwrap();
        let report = service.deliver(&plan).await;

        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ok.calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.delivered, vec!["whatsapp".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.all_delivered());
    }
}
