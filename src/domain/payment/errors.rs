//! Payment flow error types.
//!
//! Errors raised while creating, confirming or recording a payment.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | InvalidWebhook | 400 |
//! | PayPalRejected | 400 |
//! | NotFound | 404 |
//! | Provider | 500 |
//! | Internal | 500 |

/// Errors surfaced by the payment command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentFlowError {
    /// Request is missing or carries invalid fields.
    Validation {
        message: String,
        details: Option<String>,
    },

    /// The external payment provider reported a failure.
    Provider {
        message: String,
        provider_code: Option<String>,
    },

    /// The referenced provider resource does not exist.
    NotFound { resource: String },

    /// PayPal order verification refused the order.
    PayPalRejected { order_id: String, reason: String },

    /// Webhook signature or payload verification failed.
    InvalidWebhook(String),

    /// Unexpected failure while processing an otherwise valid request.
    Internal(String),
}

impl PaymentFlowError {
    pub fn validation(message: impl Into<String>) -> Self {
        PaymentFlowError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        PaymentFlowError::Validation {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn provider(message: impl Into<String>, provider_code: Option<String>) -> Self {
        PaymentFlowError::Provider {
            message: message.into(),
            provider_code,
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        PaymentFlowError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn paypal_rejected(order_id: impl Into<String>, reason: impl Into<String>) -> Self {
        PaymentFlowError::PayPalRejected {
            order_id: order_id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        PaymentFlowError::InvalidWebhook(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PaymentFlowError::Internal(message.into())
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            PaymentFlowError::Validation { message, .. } => message.clone(),
            PaymentFlowError::Provider { message, .. } => message.clone(),
            PaymentFlowError::NotFound { resource } => format!("{} not found", resource),
            PaymentFlowError::PayPalRejected { .. } => {
                "PayPal order could not be verified".to_string()
            }
            PaymentFlowError::InvalidWebhook(msg) => format!("Webhook Error: {}", msg),
            PaymentFlowError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for PaymentFlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PaymentFlowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_carries_details() {
        let err = PaymentFlowError::validation_with_details(
            "Invalid amount",
            "Amount must be at least $0.50",
        );
        assert_eq!(err.message(), "Invalid amount");
        assert!(matches!(
            err,
            PaymentFlowError::Validation { details: Some(ref d), .. } if d.contains("$0.50")
        ));
    }

    #[test]
    fn webhook_message_is_prefixed() {
        let err = PaymentFlowError::invalid_webhook("Invalid signature");
        assert_eq!(err.to_string(), "Webhook Error: Invalid signature");
    }

    #[test]
    fn provider_error_keeps_provider_message() {
        let err = PaymentFlowError::provider("Your card was declined.", Some("card_error".into()));
        assert_eq!(err.message(), "Your card was declined.");
    }

    #[test]
    fn not_found_names_resource() {
        let err = PaymentFlowError::not_found("Payment intent pi_123");
        assert_eq!(err.message(), "Payment intent pi_123 not found");
    }
}
