//! Infrastructure adapters. Implement outbound ports and drive the inbound one.
//!
//! Generation backends, delivery channels, terminal UI. Map errors to domain errors.

pub mod ai;
pub mod notify;
pub mod ui;
