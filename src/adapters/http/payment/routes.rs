//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    confirm_payment, create_payment_intent, get_payment_intent, handle_webhook, health,
    process_paypal_payment, PaymentAppState,
};

/// Create the payment API router, mounted at `/api`.
///
/// # Routes
/// - `POST /create-payment-intent` - Start a card payment
/// - `POST /process-paypal-payment` - Record a PayPal checkout
/// - `POST /confirm-payment` - Confirm a card payment
/// - `POST /webhook` - Stripe webhooks (signature verified, raw body)
/// - `GET /health` - Service status
/// - `GET /payment-intent/:id` - Payment intent snapshot
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/process-paypal-payment", post(process_paypal_payment))
        .route("/confirm-payment", post(confirm_payment))
        .route("/webhook", post(handle_webhook))
        .route("/health", get(health))
        .route("/payment-intent/:id", get(get_payment_intent))
}
