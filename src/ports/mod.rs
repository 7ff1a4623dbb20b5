//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Payment Ports
//!
//! - `PaymentGateway` - Hosted payment-intent API (create, retrieve, webhooks)
//! - `PayPalOrderVerifier` - Decides whether a reported PayPal order is genuine
//!
//! ## Notification Ports
//!
//! - `EmailSender` - Outbound email delivery
//! - `NotificationObserver` - Outcome reporting for best-effort order emails

mod email_sender;
mod notification_observer;
mod payment_gateway;
mod paypal_verifier;

pub use email_sender::{EmailError, EmailMessage, EmailSender};
pub use notification_observer::{EmailKind, NotificationObserver, SkipReason};
pub use payment_gateway::{
    CreatePaymentIntentRequest, PaymentError, PaymentErrorCode, PaymentGateway, WebhookEvent,
    WebhookEventData, WebhookEventType,
};
pub use paypal_verifier::{PayPalError, PayPalOrderVerifier, VerificationMode};
