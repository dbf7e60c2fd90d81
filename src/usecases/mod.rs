//! Application use cases. Orchestrate domain logic via ports.

pub mod plan_generator;
pub mod shopping_plan_service;

pub use plan_generator::{MealRules, PlanGenerator};
pub use shopping_plan_service::{DeliveryReport, ShoppingPlan, ShoppingPlanService};
