//! Stripe payment gateway adapter.
//!
//! Implements the `PaymentGateway` trait against the Stripe PaymentIntent API.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key).with_webhook_secret(webhook_secret);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::payment::PaymentIntent;
use crate::ports::{
    CreatePaymentIntentRequest, PaymentError, PaymentErrorCode, PaymentGateway, WebhookEvent,
};

use super::webhook_types::{SignatureHeader, StripeErrorBody, StripePaymentIntent, StripeWebhookEvent};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

pub const DEFAULT_STRIPE_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...). Webhooks are refused without it.
    webhook_secret: Option<SecretString>,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Whether to refuse test-mode events.
    require_livemode: bool,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: None,
            api_base_url: DEFAULT_STRIPE_API_BASE_URL.to_string(),
            require_livemode: false,
        }
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Require livemode events (used with live API keys).
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

/// Stripe payment gateway adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify webhook signature using HMAC-SHA256.
    ///
    /// # Security
    ///
    /// - Uses constant-time comparison to prevent timing attacks
    /// - Validates timestamp to prevent replay attacks
    fn verify_signature(&self, payload: &[u8], header: &SignatureHeader) -> Result<(), PaymentError> {
        let secret = self.config.webhook_secret.as_ref().ok_or_else(|| {
            tracing::warn!("Webhook received but no webhook secret is configured");
            PaymentError::invalid_webhook("Webhook secret not configured")
        })?;

        // 1. Validate timestamp (prevent replay attacks)
        let now = chrono::Utc::now().timestamp();
        let age = now.checked_sub(header.timestamp).ok_or_else(|| {
            tracing::warn!(event_timestamp = header.timestamp, "Webhook timestamp out of range");
            PaymentError::invalid_webhook("Event timestamp out of range")
        })?;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Webhook event from future - clock skew or manipulation"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        // 2. Compute expected signature over "{t}.{payload}"
        let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .map_err(|e| PaymentError::invalid_webhook(e.to_string()))?;
        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        // 3. Constant-time comparison against every v1 entry
        let matched = header
            .v1_signatures
            .iter()
            .any(|provided| expected.as_slice().ct_eq(provided).unwrap_u8() == 1);

        if !matched {
            tracing::warn!(
                event_timestamp = header.timestamp,
                signatures = header.v1_signatures.len(),
                "Invalid webhook signature"
            );
            return Err(PaymentError::invalid_webhook(
                "No signatures found matching the expected signature for payload",
            ));
        }

        Ok(())
    }

    /// Parse a Stripe event and convert to domain types.
    fn parse_event(&self, payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        if self.config.require_livemode && !stripe_event.livemode {
            tracing::warn!(
                event_id = %stripe_event.id,
                "Rejected test mode event in live mode"
            );
            return Err(PaymentError::invalid_webhook(
                "Test mode events not allowed in live mode",
            ));
        }

        Ok(stripe_event.into())
    }

    /// Map a non-success Stripe response to a `PaymentError`.
    async fn error_from_response(response: reqwest::Response, resource: &str) -> PaymentError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let api_error = serde_json::from_str::<StripeErrorBody>(&body)
            .ok()
            .map(|b| b.error);

        tracing::error!(status = %status, resource, body = %body, "Stripe API request failed");

        if status == reqwest::StatusCode::NOT_FOUND {
            return PaymentError::not_found(resource);
        }

        let code = if status == reqwest::StatusCode::UNAUTHORIZED {
            PaymentErrorCode::AuthenticationError
        } else {
            PaymentErrorCode::ProviderError
        };

        let message = api_error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| format!("Stripe API error: {}", status));

        let error = PaymentError::new(code, message);
        match api_error.and_then(|e| e.error_type) {
            Some(error_type) => error.with_provider_code(error_type),
            None => error,
        }
    }

    /// `{base}/v1/payment_intents/{id}` with the id as a single encoded segment.
    fn payment_intent_url(&self, id: &str) -> Result<reqwest::Url, PaymentError> {
        if matches!(id, "" | "." | "..") {
            return Err(PaymentError::not_found(&format!("Payment intent {}", id)));
        }

        let mut url = reqwest::Url::parse(&self.config.api_base_url)
            .map_err(|e| PaymentError::network(format!("Invalid Stripe API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::network("Stripe API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["v1", "payment_intents", id]);
        Ok(url)
    }

    async fn parse_intent(response: reqwest::Response) -> Result<PaymentIntent, PaymentError> {
        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;
        Ok(intent.into())
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentAdapter {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let mut params = vec![
            ("amount".to_string(), request.amount.to_string()),
            ("currency".to_string(), request.currency.clone()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
            ("description".to_string(), request.description.clone()),
        ];

        if let Some(email) = &request.receipt_email {
            params.push(("receipt_email".to_string(), email.clone()));
        }

        for (key, value) in &request.metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "Payment intent").await);
        }

        let intent = Self::parse_intent(response).await?;
        tracing::info!(
            payment_intent_id = %intent.id,
            amount = intent.amount,
            currency = %intent.currency,
            "Payment intent created"
        );
        Ok(intent)
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        let url = self.payment_intent_url(id)?;

        let response = self
            .http_client
            .get(url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .query(&[("expand[]", "payment_method")])
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let resource = format!("Payment intent {}", id);
            return Err(Self::error_from_response(response, &resource).await);
        }

        Self::parse_intent(response).await
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent, PaymentError> {
        // 1. Parse signature header
        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        // 2. Verify signature (includes timestamp validation)
        self.verify_signature(payload, &header)?;

        // 3. Parse and convert event
        let event = self.parse_event(payload)?;

        tracing::info!(
            event_id = %event.id,
            event_type = event.event_type.as_str(),
            "Webhook signature verified"
        );

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentIntentStatus;
    use crate::ports::{WebhookEventData, WebhookEventType};

    const SECRET: &str = "whsec_test_secret";

    fn test_config() -> StripeConfig {
        StripeConfig::new("sk_test_key").with_webhook_secret(SECRET)
    }

    fn create_test_signature(secret: &str, timestamp: i64, payload: &str) -> String {
        let signed_payload = format!("{}.{}", timestamp, payload);
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        let result = mac.finalize().into_bytes();

        format!("t={},v1={}", timestamp, hex::encode(result))
    }

    fn succeeded_payload() -> &'static str {
        r#"{
            "id": "evt_test123",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "livemode": false,
            "data": {
                "object": {
                    "id": "pi_test",
                    "object": "payment_intent",
                    "amount": 1999,
                    "currency": "usd",
                    "status": "succeeded",
                    "client_secret": "pi_test_secret",
                    "receipt_email": "a@b.com",
                    "metadata": {}
                }
            }
        }"#
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_new_sets_defaults() {
        let config = StripeConfig::new("sk_test_key");
        assert_eq!(config.api_base_url, "https://api.stripe.com");
        assert!(!config.require_livemode);
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn config_with_base_url_strips_trailing_slash() {
        let config = StripeConfig::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn verify_signature_valid() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = create_test_signature(SECRET, timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        assert!(adapter.verify_signature(payload.as_bytes(), &header).is_ok());
    }

    #[test]
    fn verify_signature_invalid() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = create_test_signature("wrong_secret", timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        let err = adapter
            .verify_signature(payload.as_bytes(), &header)
            .unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
    }

    #[test]
    fn verify_signature_accepts_any_matching_v1() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let good = create_test_signature(SECRET, timestamp, payload);
        let good_v1 = good.split_once(",v1=").unwrap().1;
        let header = format!("t={},v1={},v1={}", timestamp, "00".repeat(32), good_v1);

        let header = SignatureHeader::parse(&header).unwrap();
        assert!(adapter.verify_signature(payload.as_bytes(), &header).is_ok());
    }

    #[test]
    fn verify_signature_expired_timestamp() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let old_timestamp = chrono::Utc::now().timestamp() - 600;
        let signature = create_test_signature(SECRET, old_timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        let err = adapter
            .verify_signature(payload.as_bytes(), &header)
            .unwrap_err();
        assert!(err.message.contains("too old"));
    }

    #[test]
    fn verify_signature_future_timestamp() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let future_timestamp = chrono::Utc::now().timestamp() + 120;
        let signature = create_test_signature(SECRET, future_timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        let err = adapter
            .verify_signature(payload.as_bytes(), &header)
            .unwrap_err();
        assert!(err.message.contains("future"));
    }

    #[test]
    fn verify_signature_small_future_tolerance() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp() + 30;
        let signature = create_test_signature(SECRET, timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        assert!(adapter.verify_signature(payload.as_bytes(), &header).is_ok());
    }

    #[test]
    fn verify_signature_extreme_timestamps_are_rejected() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = br#"{"id":"evt_test"}"#;

        let header = SignatureHeader::parse(&format!("t={},v1=00", i64::MIN)).unwrap();
        let err = adapter.verify_signature(payload, &header).unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
        assert!(err.message.contains("out of range"));

        let header = SignatureHeader::parse(&format!("t={},v1=00", i64::MAX)).unwrap();
        let err = adapter.verify_signature(payload, &header).unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
    }

    #[test]
    fn verify_signature_without_secret_fails() {
        let adapter = StripePaymentAdapter::new(StripeConfig::new("sk_test_key"));
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = create_test_signature(SECRET, timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        let err = adapter
            .verify_signature(payload.as_bytes(), &header)
            .unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidWebhook);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // URL Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn payment_intent_url_encodes_id_as_one_segment() {
        let adapter =
            StripePaymentAdapter::new(test_config().with_base_url("http://localhost:12111"));
        let url = adapter
            .payment_intent_url("x/../../v1/customers/cus_1?expand[]=sources")
            .unwrap();

        assert_eq!(url.path_segments().unwrap().count(), 3);
        assert!(url.path().starts_with("/v1/payment_intents/x%2F..%2F"));
        assert!(url.query().is_none());
    }

    #[test]
    fn payment_intent_url_rejects_dot_segments() {
        let adapter = StripePaymentAdapter::new(test_config());
        for id in ["", ".", ".."] {
            let err = adapter.payment_intent_url(id).unwrap_err();
            assert_eq!(err.code, PaymentErrorCode::NotFound);
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Event Parsing Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn parse_payment_failed_event() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{
            "id": "evt_failed",
            "type": "payment_intent.payment_failed",
            "created": 1704067200,
            "data": {"object": {
                "id": "pi_failed", "object": "payment_intent", "amount": 500,
                "currency": "usd", "status": "requires_payment_method",
                "client_secret": null, "receipt_email": null
            }}
        }"#;

        let event = adapter.parse_event(payload.as_bytes()).unwrap();
        assert_eq!(event.event_type, WebhookEventType::PaymentIntentPaymentFailed);
        match event.data {
            WebhookEventData::PaymentIntent(intent) => {
                assert_eq!(intent.status, PaymentIntentStatus::RequiresPaymentMethod)
            }
            other => panic!("Expected payment intent data, got {:?}", other),
        }
    }

    #[test]
    fn parse_unknown_event_type() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{
            "id": "evt_unknown",
            "type": "charge.refunded",
            "created": 1704067200,
            "data": {"object": {"id": "ch_1", "object": "charge"}}
        }"#;

        let event = adapter.parse_event(payload.as_bytes()).unwrap();
        assert_eq!(
            event.event_type,
            WebhookEventType::Unknown("charge.refunded".to_string())
        );
        assert!(matches!(event.data, WebhookEventData::Raw { .. }));
    }

    #[test]
    fn parse_rejects_test_mode_when_livemode_required() {
        let adapter = StripePaymentAdapter::new(test_config().with_require_livemode(true));
        let err = adapter
            .parse_event(succeeded_payload().as_bytes())
            .unwrap_err();
        assert!(err.message.contains("Test mode"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // verify_webhook full flow
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn verify_webhook_valid_signature_and_payload() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = succeeded_payload();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = create_test_signature(SECRET, timestamp, payload);

        let event = adapter
            .verify_webhook(payload.as_bytes(), &signature)
            .unwrap();

        assert_eq!(event.id, "evt_test123");
        assert_eq!(event.event_type, WebhookEventType::PaymentIntentSucceeded);
        match event.data {
            WebhookEventData::PaymentIntent(intent) => {
                assert_eq!(intent.id, "pi_test");
                assert_eq!(intent.receipt_email.as_deref(), Some("a@b.com"));
            }
            other => panic!("Expected payment intent data, got {:?}", other),
        }
    }

    #[test]
    fn verify_webhook_rejects_tampered_payload() {
        let adapter = StripePaymentAdapter::new(test_config());
        let timestamp = chrono::Utc::now().timestamp();
        let signature = create_test_signature(SECRET, timestamp, succeeded_payload());
        let tampered = succeeded_payload().replace("1999", "1");

        assert!(adapter
            .verify_webhook(tampered.as_bytes(), &signature)
            .is_err());
    }

    #[test]
    fn verify_webhook_rejects_malformed_header() {
        let adapter = StripePaymentAdapter::new(test_config());
        let result = adapter.verify_webhook(br#"{"id":"evt_test"}"#, "malformed_header");
        assert!(result.is_err());
    }

    #[test]
    fn verify_webhook_rejects_invalid_json() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = "not valid json";
        let timestamp = chrono::Utc::now().timestamp();
        let signature = create_test_signature(SECRET, timestamp, payload);

        let err = adapter
            .verify_webhook(payload.as_bytes(), &signature)
            .unwrap_err();
        assert!(err.message.contains("Invalid JSON"));
    }
}
