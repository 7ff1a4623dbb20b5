//! HTTP adapter for payment endpoints.
//!
//! Exposes the payment flows via REST API:
//! - `POST /api/create-payment-intent` - Create a Stripe payment intent
//! - `POST /api/process-paypal-payment` - Record a completed PayPal checkout
//! - `POST /api/confirm-payment` - Confirm a card payment and send order emails
//! - `POST /api/webhook` - Handle Stripe webhooks
//! - `GET /api/health` - Service status
//! - `GET /api/payment-intent/:id` - Get a payment intent snapshot

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{not_found, PaymentApiError, PaymentAppState, ServiceStatus};
pub use routes::payment_routes;
