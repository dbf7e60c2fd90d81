//! Delivery adapters. Implement NotifierPort for email and WhatsApp.

pub mod email;
pub mod whatsapp;

pub use email::{EmailNotifier, EmailSettings};
pub use whatsapp::WhatsAppNotifier;
