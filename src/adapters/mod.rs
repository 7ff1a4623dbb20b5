//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `stripe` - Stripe payment intents and webhook verification
//! - `paypal` - PayPal order verification
//! - `email` - SMTP delivery and notification observers
//! - `http` - Axum REST API

pub mod email;
pub mod http;
pub mod paypal;
pub mod stripe;
