//! Implements InputPort. Inquire-based interactive prompt.
//!
//! Collects preferences (unless given on the command line), runs the
//! shopping plan service, prints the report and triggers delivery.

use crate::adapters::ui::progress::spinner;
use crate::domain::DomainError;
use crate::domain::format::format_compact;
use crate::ports::InputPort;
use crate::usecases::ShoppingPlanService;
use async_trait::async_trait;
use inquire::Text;
use inquire::ui::{Color, RenderConfig, Styled};
use std::sync::Arc;

const PREFERENCES_PROMPT: &str = "Enter preferred dishes, allergies, or dietary goals:";
const PREFERENCES_EXAMPLE: &str = "Tacos, Chicken, no nuts, high protein";

/// Applies the prompt theme for all subsequent inquire prompts.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("🍽").with_fg(Color::LightGreen))
        .with_answered_prompt_prefix(Styled::new("✔").with_fg(Color::LightGreen));
    inquire::set_global_render_config(config);
}

/// How the CLI run should behave.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Preferences given up front; prompt interactively when `None`.
    pub preferences: Option<String>,
    pub deliver: bool,
    /// Print the short chat layout instead of the full report.
    pub compact: bool,
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    service: Arc<ShoppingPlanService>,
    options: RunOptions,
}

impl TuiInputPort {
    pub fn new(service: Arc<ShoppingPlanService>, options: RunOptions) -> Self {
        Self { service, options }
    }

    fn read_preferences(&self) -> Result<String, DomainError> {
        if let Some(p) = &self.options.preferences {
            return Ok(p.clone());
        }
        Text::new(PREFERENCES_PROMPT)
            .with_placeholder(PREFERENCES_EXAMPLE)
            .with_help_message("Leave empty for no particular preferences")
            .prompt()
            .map_err(|e| DomainError::Input(e.to_string()))
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let preferences = self.read_preferences()?;

        let pb = spinner("Generating your weekly meal plan...");
        let result = self.service.produce_shopping_plan(&preferences).await;
        pb.finish_and_clear();

        let shopping_plan = match result {
            Ok(p) => p,
            Err(e) => {
                println!("\n❌ No meal plan available: {}", e);
                return Err(e.into());
            }
        };

        if self.options.compact {
            println!(
                "{}",
                format_compact(&shopping_plan.plan, &shopping_plan.shopping_list)
            );
        } else {
            println!("{}", shopping_plan.formatted_text);
        }

        if !self.options.deliver {
            return Ok(());
        }
        if self.service.notifier_names().is_empty() {
            println!("(no delivery channel configured)");
            return Ok(());
        }

        let report = self.service.deliver(&shopping_plan).await;
        for channel in &report.delivered {
            println!("✅ Sent via {}", channel);
        }
        for (channel, err) in &report.failed {
            println!("❌ {} delivery failed: {}", channel, err);
        }
        Ok(())
    }
}
