//! Mock generation backend for running without API calls.
//!
//! Returns a hardcoded week for development and testing purposes.

use crate::domain::{DayPlan, GenerationFailure, MealEntry, Weekday, WeeklyPlan};
use crate::ports::{GenerationBackend, GenerationRequest};
use std::time::Duration;
use tracing::info;

/// Mock generation backend.
///
/// Returns a predetermined plan without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockGenerationBackend {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    available: bool,
}

impl MockGenerationBackend {
    /// Create a new mock backend with default delay (100ms).
    pub fn new() -> Self {
        Self {
            delay_ms: 100,
            available: true,
        }
    }

    /// Create a mock backend with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            available: true,
        }
    }

    /// A backend that behaves as if no credential were configured.
    pub fn unavailable() -> Self {
        Self {
            delay_ms: 0,
            available: false,
        }
    }

    /// The week this backend always returns.
    pub fn sample_plan() -> WeeklyPlan {
        let soup = |dish: &str, extra: &[&str]| {
            let mut ingredients = vec!["pork ribs (500g)", "water (2L)", "salt"];
            ingredients.extend_from_slice(extra);
            MealEntry::new(dish, &ingredients)
                .with_instructions("Blanch the pork ribs. Simmer everything for 90 minutes. Season with salt.")
        };
        let days = [
            (
                Weekday::Monday,
                MealEntry::new("Ham and Cheese Sandwich", &["bread (10 slices)", "ham (10 slices)", "cheese (5 slices)"])
                    .with_instructions("Layer ham and cheese between bread. Toast until golden."),
                soup("ABC Soup", &["carrot (2)", "potato (3)", "tomato (2)"]),
            ),
            (
                Weekday::Tuesday,
                MealEntry::new("Soft Boiled Eggs with Toast", &["eggs (10)", "bread (10 slices)", "kaya"]),
                soup("Lotus Root Soup", &["lotus root (500g)", "red dates (10)"]),
            ),
            (
                Weekday::Wednesday,
                MealEntry::new("Steamed Pau", &["char siew pau (10)"])
                    .with_instructions("Steam for 10 minutes."),
                soup("Old Cucumber Soup", &["old cucumber (1)", "red dates (10)"]),
            ),
            (
                Weekday::Thursday,
                MealEntry::new("Fish Congee", &["rice (1 cup)", "fish fillet (300g)", "ginger"]),
                soup("ABC Soup", &["carrot (2)", "onion (1)"]),
            ),
            (
                Weekday::Friday,
                MealEntry::new("Soft Boiled Eggs with Toast", &["eggs (10)", "bread (10 slices)", "butter"]),
                soup("Watercress Soup", &["watercress (500g)"]),
            ),
            (
                Weekday::Saturday,
                MealEntry::new("Kaya Toast", &["bread (10 slices)", "kaya", "butter"]),
                soup("Lotus Root Soup", &["lotus root (500g)", "peanuts (100g)"]),
            ),
            (
                Weekday::Sunday,
                MealEntry::new("Fish Congee", &["rice (1 cup)", "fish fillet (300g)", "spring onion"]),
                soup("Old Cucumber Soup", &["old cucumber (1)", "dried scallops (5)"]),
            ),
        ];
        days.into_iter()
            .map(|(day, breakfast, dinner)| (day, DayPlan::new(breakfast, dinner)))
            .collect()
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GenerationBackend for MockGenerationBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_json(&self, request: &GenerationRequest) -> Result<String, GenerationFailure> {
        if !self.available {
            return Err(GenerationFailure::BackendUnavailable(
                "mock backend has no credential".to_string(),
            ));
        }

        info!(
            prompt_len = request.prompt.len(),
            "[MOCK] Simulating plan generation"
        );

        // Simulate network delay
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        serde_json::to_string_pretty(&Self::sample_plan())
            .map_err(|e| GenerationFailure::BackendCallFailed(format!("mock serialization: {}", e)))
    }
}
