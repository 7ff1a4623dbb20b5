//! Verifier used when no PayPal API credentials are configured.

use async_trait::async_trait;

use crate::domain::payment::{PayPalConfirmation, VerificationStatus};
use crate::ports::{PayPalError, PayPalOrderVerifier, VerificationMode};

/// Accepts every reported PayPal order without contacting PayPal.
///
/// The browser alone decides whether the order completed, so a client can
/// record an order that was never paid. Records are marked
/// [`VerificationStatus::Unverified`] and each acceptance is logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustingPayPalVerifier;

impl TrustingPayPalVerifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PayPalOrderVerifier for TrustingPayPalVerifier {
    async fn verify(
        &self,
        confirmation: &PayPalConfirmation,
    ) -> Result<VerificationStatus, PayPalError> {
        tracing::warn!(
            order_id = %confirmation.order_id,
            payer_id = %confirmation.payer_id,
            "Accepting PayPal order without server-side verification"
        );
        Ok(VerificationStatus::Unverified)
    }

    fn mode(&self) -> VerificationMode {
        VerificationMode::Trusted
    }
}
