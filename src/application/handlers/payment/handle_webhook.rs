//! HandleWebhookHandler - Command handler for signed payment gateway events.
//!
//! Every verified delivery is processed; redelivered events notify again.

use std::sync::Arc;

use crate::application::notification::{NotificationOutcome, OrderNotifier};
use crate::domain::payment::{OrderNotification, PaymentFlowError};
use crate::ports::{PaymentGateway, WebhookEvent, WebhookEventData, WebhookEventType};

/// Command to handle a webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Signature header value, if present.
    pub signature: Option<String>,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq)]
pub enum HandleWebhookResult {
    /// Payment succeeded and the order emails were processed.
    Notified {
        event_id: String,
        payment_intent_id: String,
        notification: NotificationOutcome,
    },
    /// Payment failed; logged only.
    PaymentFailed {
        event_id: String,
        payment_intent_id: Option<String>,
    },
    /// Event type this service does not act on.
    Unhandled { event_id: String, event_type: String },
}

pub struct HandleWebhookHandler {
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<OrderNotifier>,
}

impl HandleWebhookHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, notifier: Arc<OrderNotifier>) -> Self {
        Self { gateway, notifier }
    }

    pub async fn handle(
        &self,
        cmd: HandleWebhookCommand,
    ) -> Result<HandleWebhookResult, PaymentFlowError> {
        // 1. Verify webhook signature and parse event
        let signature = cmd
            .signature
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| PaymentFlowError::invalid_webhook("Missing Stripe-Signature header"))?;

        let event = self
            .gateway
            .verify_webhook(&cmd.payload, signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook verification failed");
                PaymentFlowError::invalid_webhook(e.message)
            })?;

        // 2. Dispatch on event type
        match event.event_type {
            WebhookEventType::PaymentIntentSucceeded => self.handle_succeeded(event).await,
            WebhookEventType::PaymentIntentPaymentFailed => Ok(self.handle_failed(event)),
            WebhookEventType::Unknown(event_type) => {
                tracing::info!(event_id = %event.id, event_type = %event_type, "Unhandled webhook event type");
                Ok(HandleWebhookResult::Unhandled {
                    event_id: event.id,
                    event_type,
                })
            }
        }
    }

    async fn handle_succeeded(
        &self,
        event: WebhookEvent,
    ) -> Result<HandleWebhookResult, PaymentFlowError> {
        let intent = match event.data {
            WebhookEventData::PaymentIntent(intent) => intent,
            WebhookEventData::Raw { .. } => {
                return Err(PaymentFlowError::internal(format!(
                    "Event {} is payment_intent.succeeded but carries no payment intent",
                    event.id
                )))
            }
        };

        tracing::info!(
            event_id = %event.id,
            payment_intent_id = %intent.id,
            amount = intent.amount,
            "Payment succeeded"
        );

        let payment_intent_id = intent.id.clone();
        let notification = self.notifier.notify(&OrderNotification::card(intent)).await;

        Ok(HandleWebhookResult::Notified {
            event_id: event.id,
            payment_intent_id,
            notification,
        })
    }

    fn handle_failed(&self, event: WebhookEvent) -> HandleWebhookResult {
        let payment_intent_id = match event.data {
            WebhookEventData::PaymentIntent(intent) => Some(intent.id),
            WebhookEventData::Raw { .. } => None,
        };

        tracing::warn!(
            event_id = %event.id,
            payment_intent_id = payment_intent_id.as_deref().unwrap_or("unknown"),
            "Payment failed"
        );

        HandleWebhookResult::PaymentFailed {
            event_id: event.id,
            payment_intent_id,
        }
    }
}
