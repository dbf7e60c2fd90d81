//! meal-planner: weekly meal plan + dish-grouped shopping list, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
