//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the plan schema, aggregation and rendering live here.

pub mod entities;
pub mod errors;
pub mod format;
pub mod schema;
pub mod shopping;

pub use entities::{DayPlan, GroupedShoppingList, MealEntry, MealSlot, Weekday, WeeklyPlan};
pub use errors::{DomainError, ErrorKind, GenerationFailure};
pub use schema::{SchemaNode, plan_schema};
pub use shopping::aggregate;
