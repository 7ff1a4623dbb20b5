//! Payment gateway port for card payments.
//!
//! Defines the contract for the hosted payment-intent API (e.g., Stripe).
//! The gateway owns the payment intent; callers only hold transient snapshots.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment-intent provider
//! - **Stateless**: Nothing is cached between calls
//! - **Verified events only**: Webhook events exist only after signature checks

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::payment::{PaymentFlowError, PaymentIntent};

/// Port for payment-intent gateways.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent with automatic payment-method detection.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Get a payment intent by provider ID.
    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError>;

    /// Verify a webhook signature and parse the event.
    ///
    /// Returns the parsed event if valid, error if signature invalid.
    fn verify_webhook(&self, payload: &[u8], signature: &str)
        -> Result<WebhookEvent, PaymentError>;
}

/// Request to create a payment intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor units.
    pub amount: i64,

    /// Lowercase ISO currency code.
    pub currency: String,

    /// Fixed description shown in the provider dashboard.
    pub description: String,

    /// Where the provider sends its receipt.
    pub receipt_email: Option<String>,

    /// Metadata stored on the intent.
    pub metadata: BTreeMap<String, String>,
}

/// Webhook event from the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    /// Event ID from provider.
    pub id: String,

    /// Event type.
    pub event_type: WebhookEventType,

    /// Event payload.
    pub data: WebhookEventData,

    /// When the event occurred (Unix timestamp).
    pub created_at: i64,
}

/// Types of webhook events we handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    /// Payment intent succeeded.
    PaymentIntentSucceeded,

    /// Payment intent failed.
    PaymentIntentPaymentFailed,

    /// Any other event type, kept verbatim.
    Unknown(String),
}

impl WebhookEventType {
    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::PaymentIntentSucceeded => "payment_intent.succeeded",
            WebhookEventType::PaymentIntentPaymentFailed => "payment_intent.payment_failed",
            WebhookEventType::Unknown(s) => s,
        }
    }
}

/// Webhook event payload.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEventData {
    /// The event object is a payment intent.
    PaymentIntent(PaymentIntent),

    /// Raw/unknown event data.
    Raw { json: String },
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error type (if available).
    pub provider_code: Option<String>,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, resource)
    }

    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for PaymentFlowError {
    fn from(err: PaymentError) -> Self {
        match err.code {
            PaymentErrorCode::NotFound => PaymentFlowError::not_found(err.message),
            PaymentErrorCode::InvalidWebhook => PaymentFlowError::invalid_webhook(err.message),
            _ => PaymentFlowError::provider(
                err.message,
                err.provider_code.or_else(|| Some(err.code.to_string())),
            ),
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Invalid webhook signature or payload.
    InvalidWebhook,

    /// Provider API error.
    ProviderError,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::provider("Your card was declined.").with_provider_code("card_error");
        assert!(err.to_string().contains("provider_error"));
        assert!(err.to_string().contains("Your card was declined."));
    }

    #[test]
    fn provider_error_keeps_provider_type_as_code() {
        let err = PaymentError::provider("Your card was declined.").with_provider_code("card_error");
        let flow: PaymentFlowError = err.into();
        assert_eq!(
            flow,
            PaymentFlowError::provider("Your card was declined.", Some("card_error".into()))
        );
    }

    #[test]
    fn network_error_falls_back_to_error_code() {
        let flow: PaymentFlowError = PaymentError::network("connection refused").into();
        assert_eq!(
            flow,
            PaymentFlowError::provider("connection refused", Some("network_error".into()))
        );
    }

    #[test]
    fn not_found_and_webhook_errors_keep_their_kind() {
        let flow: PaymentFlowError = PaymentError::not_found("Payment intent pi_1").into();
        assert_eq!(flow.message(), "Payment intent pi_1 not found");

        let flow: PaymentFlowError = PaymentError::invalid_webhook("Invalid signature").into();
        assert_eq!(flow.message(), "Webhook Error: Invalid signature");
    }

    #[test]
    fn event_type_strings() {
        assert_eq!(
            WebhookEventType::PaymentIntentSucceeded.as_str(),
            "payment_intent.succeeded"
        );
        assert_eq!(
            WebhookEventType::Unknown("charge.refunded".into()).as_str(),
            "charge.refunded"
        );
    }
}
