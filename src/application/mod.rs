//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
pub mod notification;

pub use notification::{NotificationOutcome, OrderEmailTemplates, OrderNotifier};
