//! Mock payment gateway for testing.
//!
//! Provides a configurable mock implementation of `PaymentGateway` for unit
//! and integration tests. Supports:
//! - Pre-configured payment intents
//! - Error injection
//! - Call tracking
//! - Webhook event simulation

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::payment::{PaymentIntent, PaymentIntentStatus};
use crate::ports::{
    CreatePaymentIntentRequest, PaymentError, PaymentGateway, WebhookEvent, WebhookEventData,
    WebhookEventType,
};

use super::webhook_types::StripeWebhookEvent;

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
/// mock.add_intent(MockPaymentGateway::intent("pi_1", PaymentIntentStatus::Succeeded));
/// mock.set_method_error("create_payment_intent", PaymentError::provider("declined"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    /// Inner state (shared between clones).
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Known payment intents by ID.
    intents: HashMap<String, PaymentIntent>,

    /// Counter for generated intent IDs.
    next_id: u32,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Requests passed to `create_payment_intent`.
    create_requests: Vec<CreatePaymentIntentRequest>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Webhook verification behavior.
    webhook_verify_mode: WebhookVerifyMode,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

#[derive(Default, Clone)]
enum WebhookVerifyMode {
    /// Accept any payload and parse it as a Stripe event.
    #[default]
    AcceptAll,

    /// Require an exact signature header value.
    RequireSignature(String),

    /// Always fail verification.
    AlwaysFail,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks() -> Self {
        let mock = Self::new();
        mock.state().webhook_verify_mode = WebhookVerifyMode::AlwaysFail;
        mock
    }

    /// Create a mock that only accepts the given signature header.
    pub fn requiring_signature(signature: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.state().webhook_verify_mode = WebhookVerifyMode::RequireSignature(signature.into());
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a payment intent to the "gateway".
    pub fn add_intent(&self, intent: PaymentIntent) {
        self.state().intents.insert(intent.id.clone(), intent);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Requests received by `create_payment_intent`, in order.
    pub fn create_requests(&self) -> Vec<CreatePaymentIntentRequest> {
        self.state().create_requests.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record_call(
            "create_payment_intent",
            vec![request.amount.to_string(), request.currency.clone()],
        );
        self.check_error("create_payment_intent")?;

        let mut state = self.state();
        state.next_id += 1;
        let id = format!("pi_mock_{}", state.next_id);

        let intent = PaymentIntent {
            client_secret: Some(format!("{}_secret_mock", id)),
            id: id.clone(),
            status: PaymentIntentStatus::RequiresPaymentMethod,
            amount: request.amount,
            currency: request.currency.clone(),
            created: chrono::Utc::now().timestamp(),
            payment_method: None,
            metadata: request.metadata.clone(),
            receipt_email: request.receipt_email.clone(),
        };

        state.intents.insert(id, intent.clone());
        state.create_requests.push(request);
        Ok(intent)
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        self.record_call("retrieve_payment_intent", vec![id.to_string()]);
        self.check_error("retrieve_payment_intent")?;

        self.state()
            .intents
            .get(id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found(&format!("Payment intent {}", id)))
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent, PaymentError> {
        self.record_call(
            "verify_webhook",
            vec![
                String::from_utf8_lossy(payload).chars().take(50).collect(),
                signature.chars().take(20).collect(),
            ],
        );
        self.check_error("verify_webhook")?;

        match &self.state().webhook_verify_mode {
            WebhookVerifyMode::AcceptAll => {}
            WebhookVerifyMode::RequireSignature(required) => {
                if signature != required {
                    return Err(PaymentError::invalid_webhook("Invalid signature"));
                }
            }
            WebhookVerifyMode::AlwaysFail => {
                return Err(PaymentError::invalid_webhook("Verification disabled"));
            }
        }

        let event: StripeWebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::invalid_webhook(format!("Invalid JSON: {}", e)))?;
        Ok(event.into())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Test Helpers
// ════════════════════════════════════════════════════════════════════════════════

impl MockPaymentGateway {
    /// A payment intent with the given status and sensible defaults.
    pub fn intent(id: &str, status: PaymentIntentStatus) -> PaymentIntent {
        PaymentIntent {
            id: id.to_string(),
            client_secret: Some(format!("{}_secret_mock", id)),
            status,
            amount: 1999,
            currency: "usd".to_string(),
            created: chrono::Utc::now().timestamp(),
            payment_method: Some("pm_mock".to_string()),
            metadata: Default::default(),
            receipt_email: Some("customer@example.com".to_string()),
        }
    }

    /// A verified `payment_intent.succeeded` event.
    pub fn succeeded_event(intent: PaymentIntent) -> WebhookEvent {
        WebhookEvent {
            id: format!("evt_succeeded_{}", intent.id),
            event_type: WebhookEventType::PaymentIntentSucceeded,
            data: WebhookEventData::PaymentIntent(intent),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}
