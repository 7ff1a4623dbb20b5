//! Card payment intent snapshot.
//!
//! The payment intent lives in the card gateway; this is the transient view
//! the service works with for a single request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Payment intent lifecycle status as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    /// A status this service does not know about, kept verbatim.
    Unknown(String),
}

impl PaymentIntentStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "requires_payment_method" => Self::RequiresPaymentMethod,
            "requires_confirmation" => Self::RequiresConfirmation,
            "requires_action" => Self::RequiresAction,
            "processing" => Self::Processing,
            "requires_capture" => Self::RequiresCapture,
            "canceled" => Self::Canceled,
            "succeeded" => Self::Succeeded,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The literal provider status string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::RequiresConfirmation => "requires_confirmation",
            Self::RequiresAction => "requires_action",
            Self::Processing => "processing",
            Self::RequiresCapture => "requires_capture",
            Self::Canceled => "canceled",
            Self::Succeeded => "succeeded",
            Self::Unknown(s) => s,
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl From<String> for PaymentIntentStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PaymentIntentStatus> for String {
    fn from(value: PaymentIntentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment intent as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Gateway identifier (pi_...).
    pub id: String,

    /// Secret handed to the browser to confirm the payment.
    pub client_secret: Option<String>,

    pub status: PaymentIntentStatus,

    /// Amount in minor units.
    pub amount: i64,

    pub currency: String,

    /// Unix timestamp of creation.
    pub created: i64,

    /// Attached payment method id, once one exists.
    pub payment_method: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    pub receipt_email: Option<String>,
}

impl PaymentIntent {
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_known_and_unknown_values() {
        assert_eq!(
            PaymentIntentStatus::parse("succeeded"),
            PaymentIntentStatus::Succeeded
        );
        let unknown = PaymentIntentStatus::parse("requires_review");
        assert_eq!(unknown.as_str(), "requires_review");
        assert!(!unknown.is_succeeded());
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let json = serde_json::to_string(&PaymentIntentStatus::RequiresAction).unwrap();
        assert_eq!(json, "\"requires_action\"");
        let parsed: PaymentIntentStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(parsed, PaymentIntentStatus::Processing);
    }

    #[test]
    fn metadata_value_ignores_blank_entries() {
        let mut metadata = BTreeMap::new();
        metadata.insert("customer_email".to_string(), " ".to_string());
        metadata.insert("customer_name".to_string(), "Ada".to_string());
        let intent = PaymentIntent {
            id: "pi_1".into(),
            client_secret: None,
            status: PaymentIntentStatus::Succeeded,
            amount: 100,
            currency: "usd".into(),
            created: 0,
            payment_method: None,
            metadata,
            receipt_email: None,
        };
        assert_eq!(intent.metadata_value("customer_email"), None);
        assert_eq!(intent.metadata_value("customer_name"), Some("Ada"));
    }
}
