//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! These types define the JSON request/response structure for the payment API.
//! Field names follow what the storefront already sends (`orderID`, `payerID`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::payment::{
    AmountInput, CustomerInfo, LineItem, PayPalPaymentRecord, PaymentIntent,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a card payment intent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor units. Kept loose so a missing or non-integer amount
    /// is reported as `Invalid amount` rather than a body error.
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
    #[serde(default)]
    pub items: Option<Vec<LineItem>>,
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, Value>>,
}

impl CreatePaymentIntentRequest {
    /// Whole-number amount in minor units.
    pub fn minor_units(&self) -> Option<i64> {
        match self.amount.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            _ => None,
        }
    }

    /// Metadata flattened to provider-compatible string values.
    pub fn string_metadata(&self) -> BTreeMap<String, String> {
        self.metadata
            .iter()
            .flatten()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect()
    }
}

/// Request to record a completed PayPal checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessPayPalPaymentRequest {
    #[serde(rename = "orderID", default)]
    pub order_id: Option<String>,
    #[serde(rename = "payerID", default)]
    pub payer_id: Option<String>,
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
    #[serde(default)]
    pub items: Option<Vec<LineItem>>,
}

/// Request to confirm a card payment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmPaymentRequest {
    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentIntentResponse {
    pub success: bool,
    pub client_secret: String,
    pub payment_intent_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayPalPaymentResponse {
    pub success: bool,
    pub payment: PayPalPaymentRecord,
}

/// Payment intent fields safe to hand back to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentIntentView {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub created: i64,
    pub payment_method: Option<String>,
}

impl From<PaymentIntent> for PaymentIntentView {
    fn from(intent: PaymentIntent) -> Self {
        Self {
            id: intent.id,
            status: intent.status.as_str().to_string(),
            amount: intent.amount,
            currency: intent.currency,
            created: intent.created,
            payment_method: intent.payment_method,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ConfirmPaymentResponse {
    Succeeded {
        success: bool,
        payment_intent: PaymentIntentView,
    },
    NotSucceeded {
        success: bool,
        status: String,
        message: String,
    },
}

/// Snapshot of a payment intent.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntentResponse {
    pub success: bool,
    #[serde(flatten)]
    pub payment_intent: PaymentIntentView,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
}

/// Health check body. Carries only derived flags, never secrets.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub environment: &'static str,
    pub services: ServicesHealth,
    pub supported_payment_methods: [&'static str; 2],
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServicesHealth {
    pub stripe_configured: bool,
    pub webhook_configured: bool,
    pub email_configured: bool,
    pub paypal_verification: &'static str,
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
            code: None,
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }
}

/// Error body for the webhook route.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookErrorResponse {
    pub received: bool,
    pub error: String,
}
