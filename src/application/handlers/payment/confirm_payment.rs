//! ConfirmPaymentHandler - Command handler for the browser's post-payment
//! confirmation.
//!
//! Sends the order emails once the intent has succeeded. Any other status is
//! reported back as-is; it is not an error.

use std::sync::Arc;

use crate::application::notification::{NotificationOutcome, OrderNotifier};
use crate::domain::payment::{OrderNotification, PaymentFlowError, PaymentIntent, PaymentIntentStatus};
use crate::ports::PaymentGateway;

/// Command to confirm a payment intent.
#[derive(Debug, Clone, Default)]
pub struct ConfirmPaymentCommand {
    pub payment_intent_id: Option<String>,
}

/// Result of a confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmPaymentResult {
    /// The intent succeeded and the order emails were processed.
    Succeeded {
        intent: PaymentIntent,
        notification: NotificationOutcome,
    },
    /// The intent is in some other state; nothing was sent.
    NotYetSucceeded { status: PaymentIntentStatus },
}

pub struct ConfirmPaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<OrderNotifier>,
}

impl ConfirmPaymentHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, notifier: Arc<OrderNotifier>) -> Self {
        Self { gateway, notifier }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmPaymentCommand,
    ) -> Result<ConfirmPaymentResult, PaymentFlowError> {
        let id = cmd
            .payment_intent_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PaymentFlowError::validation("Payment intent ID is required"))?;

        let intent = self.gateway.retrieve_payment_intent(id).await?;

        if !intent.status.is_succeeded() {
            tracing::info!(
                payment_intent_id = %intent.id,
                status = %intent.status,
                "Payment intent not yet succeeded"
            );
            return Ok(ConfirmPaymentResult::NotYetSucceeded {
                status: intent.status,
            });
        }

        tracing::info!(payment_intent_id = %intent.id, "Payment confirmed");
        let notification = self
            .notifier
            .notify(&OrderNotification::card(intent.clone()))
            .await;

        Ok(ConfirmPaymentResult::Succeeded {
            intent,
            notification,
        })
    }
}
