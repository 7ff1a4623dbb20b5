//! Payment handlers.
//!
//! ## Commands
//! - Creating card payment intents
//! - Confirming card payments
//! - Recording PayPal payments
//! - Processing gateway webhooks
//!
//! ## Queries
//! - Get payment intent snapshot

mod confirm_payment;
mod create_payment_intent;
mod get_payment_intent;
mod handle_webhook;
mod process_paypal_payment;

// Commands
pub use confirm_payment::{ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentResult};
pub use create_payment_intent::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
};
pub use handle_webhook::{HandleWebhookCommand, HandleWebhookHandler, HandleWebhookResult};
pub use process_paypal_payment::{
    ProcessPayPalPaymentCommand, ProcessPayPalPaymentHandler, ProcessPayPalPaymentResult,
};

// Queries
pub use get_payment_intent::{GetPaymentIntentHandler, GetPaymentIntentQuery};
