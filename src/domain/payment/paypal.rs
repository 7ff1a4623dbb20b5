//! PayPal confirmation values.
//!
//! The browser completes the PayPal checkout and reports the order to this
//! service. The record built here is local; whether it was checked against
//! PayPal is captured in [`VerificationStatus`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::PaymentFlowError;
use super::money::format_major_units;
use super::request::{non_blank, CustomerInfo};

/// Status written on every confirmed PayPal record.
pub const PAYPAL_COMPLETED: &str = "COMPLETED";

/// Currency PayPal orders are taken in.
pub const PAYPAL_CURRENCY: &str = "USD";

const MISSING_PAYMENT_INFO: &str = "Missing required payment information";

/// Amount as sent by the browser: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Positive, finite major-unit value.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) => s.trim().parse().ok()?,
        };
        (value.is_finite() && value > 0.0).then_some(value)
    }
}

/// Validated PayPal confirmation reported by the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct PayPalConfirmation {
    pub order_id: String,
    pub payer_id: String,
    pub amount: f64,
}

impl PayPalConfirmation {
    /// Requires an order id, a payer id and a positive amount.
    pub fn new(
        order_id: Option<&str>,
        payer_id: Option<&str>,
        amount: Option<&AmountInput>,
    ) -> Result<Self, PaymentFlowError> {
        match (
            non_blank(order_id),
            non_blank(payer_id),
            amount.and_then(AmountInput::value),
        ) {
            (Some(order_id), Some(payer_id), Some(amount)) => Ok(Self {
                order_id: order_id.to_string(),
                payer_id: payer_id.to_string(),
                amount,
            }),
            _ => Err(PaymentFlowError::validation(MISSING_PAYMENT_INFO)),
        }
    }
}

/// Whether the order was checked with PayPal before the record was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// PayPal confirmed the order and payer.
    Verified,
    /// Accepted on the browser's word alone.
    Unverified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPalAmount {
    pub currency_code: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPalPayerName {
    pub given_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

impl PayPalPayerName {
    fn from_full_name(full: &str) -> Self {
        match full.trim().split_once(' ') {
            Some((given, rest)) if !rest.trim().is_empty() => Self {
                given_name: given.to_string(),
                surname: Some(rest.trim().to_string()),
            },
            _ => Self {
                given_name: full.trim().to_string(),
                surname: None,
            },
        }
    }

    pub fn full_name(&self) -> String {
        match &self.surname {
            Some(surname) => format!("{} {}", self.given_name, surname),
            None => self.given_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPalPayer {
    pub payer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<PayPalPayerName>,
}

/// Locally synthesized record of a PayPal payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPalPaymentRecord {
    /// The PayPal order id reported by the browser.
    pub id: String,
    pub status: String,
    pub amount: PayPalAmount,
    pub payer: PayPalPayer,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub payment_method: String,
    pub verification: VerificationStatus,
}

impl PayPalPaymentRecord {
    /// Builds the completed record for a confirmation.
    pub fn completed(
        confirmation: &PayPalConfirmation,
        customer: Option<&CustomerInfo>,
        verification: VerificationStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: confirmation.order_id.clone(),
            status: PAYPAL_COMPLETED.to_string(),
            amount: PayPalAmount {
                currency_code: PAYPAL_CURRENCY.to_string(),
                value: format_major_units(confirmation.amount),
            },
            payer: PayPalPayer {
                payer_id: confirmation.payer_id.clone(),
                email_address: customer.and_then(CustomerInfo::email).map(str::to_string),
                name: customer
                    .and_then(CustomerInfo::name)
                    .map(PayPalPayerName::from_full_name),
            },
            create_time: now,
            update_time: now,
            payment_method: "paypal".to_string(),
            verification,
        }
    }
}
