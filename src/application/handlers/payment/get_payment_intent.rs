//! GetPaymentIntentHandler - Query handler for a payment intent snapshot.

use std::sync::Arc;

use crate::domain::payment::{PaymentFlowError, PaymentIntent};
use crate::ports::PaymentGateway;

#[derive(Debug, Clone)]
pub struct GetPaymentIntentQuery {
    pub payment_intent_id: String,
}

pub struct GetPaymentIntentHandler {
    gateway: Arc<dyn PaymentGateway>,
}

impl GetPaymentIntentHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, query: GetPaymentIntentQuery) -> Result<PaymentIntent, PaymentFlowError> {
        self.gateway
            .retrieve_payment_intent(&query.payment_intent_id)
            .await
            .map_err(|e| {
                tracing::warn!(
                    payment_intent_id = %query.payment_intent_id,
                    error = %e,
                    "Failed to retrieve payment intent"
                );
                PaymentFlowError::from(e)
            })
    }
}
