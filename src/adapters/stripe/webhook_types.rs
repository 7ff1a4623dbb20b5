//! Stripe wire types.
//!
//! These types represent Stripe API objects as they arrive in API responses
//! and webhook payloads, and map them to domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::payment::{PaymentIntent, PaymentIntentStatus};
use crate::ports::{WebhookEvent, WebhookEventData, WebhookEventType};

// ════════════════════════════════════════════════════════════════════════════════
// Signature Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParseError {
    /// Header is empty.
    MissingHeader,
    /// Missing timestamp component (t=...).
    MissingTimestamp,
    /// Missing v1 signature component.
    MissingV1Signature,
    /// Invalid timestamp format.
    InvalidTimestamp,
    /// Invalid signature format (not valid hex).
    InvalidSignatureFormat,
}

impl std::fmt::Display for SignatureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "Missing Stripe-Signature header"),
            Self::MissingTimestamp => write!(f, "Missing timestamp (t=) in signature"),
            Self::MissingV1Signature => write!(f, "Missing v1 signature in header"),
            Self::InvalidTimestamp => write!(f, "Invalid timestamp format"),
            Self::InvalidSignatureFormat => write!(f, "Invalid signature format (not valid hex)"),
        }
    }
}

impl std::error::Error for SignatureParseError {}

/// Parsed Stripe-Signature header components.
///
/// The header format is `t=timestamp,v1=signature[,v1=signature...]`. Stripe
/// sends more than one v1 entry while a signing secret is being rolled.
#[derive(Debug, Clone)]
pub struct SignatureHeader {
    /// Unix timestamp when Stripe signed the event.
    pub timestamp: i64,

    /// v1 signatures (HMAC-SHA256), decoded from hex.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.trim().is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or(SignatureParseError::MissingTimestamp)?;

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    let signature = hex::decode(value.trim())
                        .map_err(|_| SignatureParseError::InvalidSignatureFormat)?;
                    v1_signatures.push(signature);
                }
                // v0 and unknown schemes are ignored
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureParseError::MissingTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(SignatureParseError::MissingV1Signature);
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Event Types
// ════════════════════════════════════════════════════════════════════════════════

/// Raw Stripe webhook event as received from the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeWebhookEvent {
    /// Unique event identifier (evt_...).
    pub id: String,

    /// Event type (e.g., "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    pub created: i64,

    /// Event payload containing the affected object.
    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,
}

/// Event data container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object affected by this event.
    pub object: serde_json::Value,
}

impl StripeWebhookEvent {
    /// The event object as a payment intent, when it is one.
    pub fn payment_intent(&self) -> Option<StripePaymentIntent> {
        let is_intent = self
            .data
            .object
            .get("object")
            .and_then(serde_json::Value::as_str)
            == Some("payment_intent");
        if !is_intent {
            return None;
        }
        serde_json::from_value(self.data.object.clone()).ok()
    }
}

impl From<StripeWebhookEvent> for WebhookEvent {
    fn from(event: StripeWebhookEvent) -> Self {
        let event_type = match event.event_type.as_str() {
            "payment_intent.succeeded" => WebhookEventType::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => WebhookEventType::PaymentIntentPaymentFailed,
            other => WebhookEventType::Unknown(other.to_string()),
        };

        let data = match event.payment_intent() {
            Some(intent) => WebhookEventData::PaymentIntent(intent.into()),
            None => WebhookEventData::Raw {
                json: event.data.object.to_string(),
            },
        };

        WebhookEvent {
            id: event.id,
            event_type,
            data,
            created_at: event.created,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Object Types
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe PaymentIntent object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentIntent {
    /// Unique identifier (pi_...).
    pub id: String,

    pub client_secret: Option<String>,

    /// Lifecycle status (requires_payment_method, succeeded, ...).
    pub status: String,

    /// Amount in cents.
    pub amount: i64,

    /// Currency (lowercase).
    pub currency: String,

    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,

    /// Payment method ID, or the expanded object.
    #[serde(default)]
    pub payment_method: Option<serde_json::Value>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    pub receipt_email: Option<String>,
}

impl From<StripePaymentIntent> for PaymentIntent {
    fn from(intent: StripePaymentIntent) -> Self {
        let payment_method = intent.payment_method.and_then(|pm| match pm {
            serde_json::Value::String(id) => Some(id),
            other => other
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        });

        PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            status: PaymentIntentStatus::parse(&intent.status),
            amount: intent.amount,
            currency: intent.currency,
            created: intent.created,
            payment_method,
            metadata: intent.metadata,
            receipt_email: intent.receipt_email,
        }
    }
}

/// Stripe error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    pub message: Option<String>,

    /// Error type (card_error, invalid_request_error, ...).
    #[serde(rename = "type")]
    pub error_type: Option<String>,

    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════════════════
    // Signature Header Tests
    // ══════════════════════════════════════════════════════════════════════════

    #[test]
    fn parse_signature_header_valid() {
        let header = "t=1704067200,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd";
        let parsed = SignatureHeader::parse(header).unwrap();

        assert_eq!(parsed.timestamp, 1704067200);
        assert_eq!(parsed.v1_signatures.len(), 1);
        assert_eq!(parsed.v1_signatures[0].len(), 32);
    }

    #[test]
    fn parse_signature_header_keeps_every_v1() {
        let header = "t=1704067200,v1=abcd,v0=ffff,v1=1234";
        let parsed = SignatureHeader::parse(header).unwrap();
        assert_eq!(parsed.v1_signatures, vec![vec![0xab, 0xcd], vec![0x12, 0x34]]);
    }

    #[test]
    fn parse_signature_header_missing_timestamp() {
        let result = SignatureHeader::parse("v1=abcd");
        assert_eq!(result.unwrap_err(), SignatureParseError::MissingTimestamp);
    }

    #[test]
    fn parse_signature_header_missing_v1() {
        let result = SignatureHeader::parse("t=1704067200,v0=abcd");
        assert_eq!(result.unwrap_err(), SignatureParseError::MissingV1Signature);
    }

    #[test]
    fn parse_signature_header_empty() {
        let result = SignatureHeader::parse("");
        assert_eq!(result.unwrap_err(), SignatureParseError::MissingHeader);
    }

    #[test]
    fn parse_signature_header_invalid_timestamp() {
        let result = SignatureHeader::parse("t=yesterday,v1=abcd");
        assert_eq!(result.unwrap_err(), SignatureParseError::InvalidTimestamp);
    }

    #[test]
    fn parse_signature_header_invalid_hex() {
        let result = SignatureHeader::parse("t=1704067200,v1=not-hex");
        assert_eq!(result.unwrap_err(), SignatureParseError::InvalidSignatureFormat);
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Event Parsing Tests
    // ══════════════════════════════════════════════════════════════════════════

    #[test]
    fn parse_payment_intent_succeeded_event() {
        let json = r#"{
            "id": "evt_1",
            "object": "event",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "livemode": false,
            "data": {
                "object": {
                    "id": "pi_123",
                    "object": "payment_intent",
                    "amount": 2500,
                    "currency": "usd",
                    "status": "succeeded",
                    "client_secret": "pi_123_secret_abc",
                    "created": 1704067100,
                    "payment_method": "pm_1",
                    "receipt_email": "a@b.com",
                    "metadata": {"customer_name": "Ada", "items_count": "2"}
                }
            }
        }"#;

        let event: StripeWebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "payment_intent.succeeded");

        let intent: PaymentIntent = event.payment_intent().unwrap().into();
        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.status, PaymentIntentStatus::Succeeded);
        assert_eq!(intent.payment_method.as_deref(), Some("pm_1"));
        assert_eq!(intent.metadata_value("customer_name"), Some("Ada"));
    }

    #[test]
    fn non_intent_objects_are_not_payment_intents() {
        let json = r#"{
            "id": "evt_2",
            "type": "charge.refunded",
            "created": 1704067200,
            "data": {"object": {"id": "ch_1", "object": "charge", "amount": 100}}
        }"#;

        let event: StripeWebhookEvent = serde_json::from_str(json).unwrap();
        assert!(event.payment_intent().is_none());
    }

    #[test]
    fn expanded_payment_method_maps_to_id() {
        let json = r#"{
            "id": "pi_1", "status": "processing", "amount": 100, "currency": "usd",
            "client_secret": null, "receipt_email": null,
            "payment_method": {"id": "pm_9", "type": "card"}
        }"#;
        let intent: PaymentIntent = serde_json::from_str::<StripePaymentIntent>(json)
            .unwrap()
            .into();
        assert_eq!(intent.payment_method.as_deref(), Some("pm_9"));
        assert!(intent.metadata.is_empty());
    }

    #[test]
    fn parse_error_body() {
        let json = r#"{"error": {"message": "Your card was declined.", "type": "card_error", "code": "card_declined"}}"#;
        let body: StripeErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.message.as_deref(), Some("Your card was declined."));
        assert_eq!(body.error.error_type.as_deref(), Some("card_error"));
        assert_eq!(body.error.code.as_deref(), Some("card_declined"));
    }
}
