//! PayPal order verification port.
//!
//! The browser reports a completed PayPal checkout. A verifier decides
//! whether that report is backed by PayPal before the order is recorded.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::payment::{PayPalConfirmation, PaymentFlowError, VerificationStatus};

/// How PayPal confirmations are checked, reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationMode {
    /// Orders are looked up with PayPal.
    Verified,
    /// Orders are accepted as reported.
    Trusted,
}

impl VerificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMode::Verified => "verified",
            VerificationMode::Trusted => "trusted",
        }
    }
}

/// Port for PayPal order verification.
#[async_trait]
pub trait PayPalOrderVerifier: Send + Sync {
    /// Check a reported order.
    ///
    /// Returns the verification status to record, or an error when the
    /// order must not be recorded.
    async fn verify(
        &self,
        confirmation: &PayPalConfirmation,
    ) -> Result<VerificationStatus, PayPalError>;

    fn mode(&self) -> VerificationMode;
}

/// Errors from PayPal verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayPalError {
    /// PayPal does not back the reported order.
    #[error("PayPal order {order_id} rejected: {reason}")]
    Rejected { order_id: String, reason: String },

    /// OAuth token request was refused.
    #[error("PayPal authentication failed: {0}")]
    Authentication(String),

    /// PayPal answered with an unexpected status.
    #[error("PayPal API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// PayPal could not be reached.
    #[error("PayPal request failed: {0}")]
    Network(String),
}

impl PayPalError {
    pub fn rejected(order_id: impl Into<String>, reason: impl Into<String>) -> Self {
        PayPalError::Rejected {
            order_id: order_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<PayPalError> for PaymentFlowError {
    fn from(err: PayPalError) -> Self {
        match err {
            PayPalError::Rejected { order_id, reason } => {
                PaymentFlowError::paypal_rejected(order_id, reason)
            }
            other => PaymentFlowError::provider(other.to_string(), Some("paypal_error".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paypal_verifier_is_object_safe() {
        fn _accepts_dyn(_verifier: &dyn PayPalOrderVerifier) {}
    }

    #[test]
    fn rejection_maps_to_paypal_rejected() {
        let flow: PaymentFlowError = PayPalError::rejected("O1", "status VOIDED").into();
        assert!(matches!(flow, PaymentFlowError::PayPalRejected { .. }));
        assert_eq!(flow.message(), "PayPal order could not be verified");
    }

    #[test]
    fn transport_failures_map_to_provider_errors() {
        let flow: PaymentFlowError = PayPalError::Network("timed out".into()).into();
        assert!(matches!(flow, PaymentFlowError::Provider { .. }));
        assert!(flow.message().contains("timed out"));
    }
}
