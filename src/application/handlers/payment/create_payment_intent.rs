//! CreatePaymentIntentHandler - Command handler for starting a card payment.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::payment::{CustomerInfo, LineItem, PaymentFlowError, PaymentRequest};
use crate::ports::{CreatePaymentIntentRequest, PaymentGateway};

/// Command to create a payment intent.
#[derive(Debug, Clone, Default)]
pub struct CreatePaymentIntentCommand {
    /// Amount in minor units; `None` when absent or not a whole number.
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub customer: Option<CustomerInfo>,
    pub items: Vec<LineItem>,
    pub metadata: BTreeMap<String, String>,
}

/// Result of a created payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentIntentResult {
    pub client_secret: String,
    pub payment_intent_id: String,
}

/// Handler for creating card payment intents.
pub struct CreatePaymentIntentHandler {
    gateway: Arc<dyn PaymentGateway>,
    description: String,
}

impl CreatePaymentIntentHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, store_name: &str) -> Self {
        Self {
            gateway,
            description: format!("{} order", store_name),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, PaymentFlowError> {
        // 1. Validate
        let request = PaymentRequest::new(
            cmd.amount,
            cmd.currency,
            cmd.customer,
            cmd.items,
            cmd.metadata,
        )?;

        // 2. Create with the gateway
        let intent = self
            .gateway
            .create_payment_intent(CreatePaymentIntentRequest {
                amount: request.amount(),
                currency: request.currency().to_string(),
                description: self.description.clone(),
                receipt_email: request.receipt_email().map(str::to_string),
                metadata: request.merged_metadata(),
            })
            .await
            .map_err(|e| {
                tracing::error!(error = %e, amount = request.amount(), "Failed to create payment intent");
                PaymentFlowError::from(e)
            })?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentFlowError::internal(format!("Payment intent {} has no client secret", intent.id))
        })?;

        Ok(CreatePaymentIntentResult {
            client_secret,
            payment_intent_id: intent.id,
        })
    }
}
