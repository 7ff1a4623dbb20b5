//! Order notification.

mod order_notifier;
mod templates;

pub use order_notifier::{DeliveryResult, NotificationOutcome, OrderNotifier};
pub use templates::{OrderEmailTemplates, RenderedEmail};
