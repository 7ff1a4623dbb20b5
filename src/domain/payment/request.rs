//! Inbound payment request values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::PaymentFlowError;
use super::money::MIN_CHARGE_AMOUNT;

/// Default currency when the storefront omits one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Customer details as supplied by the storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CustomerInfo {
    /// Non-blank email address.
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// Non-blank display name.
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }
}

/// A cart line item. Only the count is required by the payment flow; the
/// remaining fields are echoed into emails when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Validated request to charge a card.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    amount: i64,
    currency: String,
    customer: Option<CustomerInfo>,
    items: Vec<LineItem>,
    metadata: BTreeMap<String, String>,
}

impl PaymentRequest {
    /// Builds a request, rejecting missing amounts and amounts under the
    /// minimum charge.
    pub fn new(
        amount: Option<i64>,
        currency: Option<String>,
        customer: Option<CustomerInfo>,
        items: Vec<LineItem>,
        metadata: BTreeMap<String, String>,
    ) -> Result<Self, PaymentFlowError> {
        let amount = match amount {
            Some(amount) if amount >= MIN_CHARGE_AMOUNT => amount,
            _ => {
                return Err(PaymentFlowError::validation_with_details(
                    "Invalid amount",
                    "Amount must be at least $0.50",
                ))
            }
        };

        let currency = currency
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(Self {
            amount,
            currency,
            customer,
            items,
            metadata,
        })
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Email the provider should send its receipt to.
    pub fn receipt_email(&self) -> Option<&str> {
        self.customer.as_ref().and_then(CustomerInfo::email)
    }

    /// Caller metadata plus the derived customer and cart keys.
    ///
    /// Derived keys overwrite caller keys of the same name.
    pub fn merged_metadata(&self) -> BTreeMap<String, String> {
        let mut merged = self.metadata.clone();
        let customer = self.customer.as_ref();
        merged.insert(
            "customer_email".to_string(),
            customer.and_then(CustomerInfo::email).unwrap_or_default().to_string(),
        );
        merged.insert(
            "customer_name".to_string(),
            customer.and_then(CustomerInfo::name).unwrap_or_default().to_string(),
        );
        merged.insert("items_count".to_string(), self.items.len().to_string());
        merged
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            email: Some("a@b.com".to_string()),
            name: Some("Ada Lovelace".to_string()),
        }
    }

    #[test]
    fn rejects_missing_amount() {
        let err = PaymentRequest::new(None, None, None, vec![], BTreeMap::new()).unwrap_err();
        assert_eq!(err.message(), "Invalid amount");
    }

    #[test]
    fn accepts_minimum_amount_and_defaults_currency() {
        let request = PaymentRequest::new(Some(50), None, None, vec![], BTreeMap::new()).unwrap();
        assert_eq!(request.amount(), 50);
        assert_eq!(request.currency(), "usd");
    }

    #[test]
    fn normalizes_currency() {
        let request =
            PaymentRequest::new(Some(1000), Some(" EUR ".into()), None, vec![], BTreeMap::new())
                .unwrap();
        assert_eq!(request.currency(), "eur");
    }

    #[test]
    fn merged_metadata_adds_derived_keys() {
        let mut metadata = BTreeMap::new();
        metadata.insert("order_ref".to_string(), "web-42".to_string());
        metadata.insert("items_count".to_string(), "999".to_string());

        let request = PaymentRequest::new(
            Some(2500),
            None,
            Some(customer()),
            vec![LineItem::default(), LineItem::default()],
            metadata,
        )
        .unwrap();

        let merged = request.merged_metadata();
        assert_eq!(merged["order_ref"], "web-42");
        assert_eq!(merged["customer_email"], "a@b.com");
        assert_eq!(merged["customer_name"], "Ada Lovelace");
        assert_eq!(merged["items_count"], "2");
        assert_eq!(request.receipt_email(), Some("a@b.com"));
    }

    #[test]
    fn blank_customer_email_is_not_a_receipt_email() {
        let request = PaymentRequest::new(
            Some(2500),
            None,
            Some(CustomerInfo {
                email: Some("   ".to_string()),
                name: None,
            }),
            vec![],
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(request.receipt_email(), None);
        assert_eq!(request.merged_metadata()["customer_email"], "");
    }

    proptest! {
        #[test]
        fn amounts_below_minimum_are_rejected(amount in i64::MIN..MIN_CHARGE_AMOUNT) {
            let result = PaymentRequest::new(Some(amount), None, None, vec![], BTreeMap::new());
            prop_assert!(result.is_err());
        }

        #[test]
        fn amounts_at_or_above_minimum_are_accepted(amount in MIN_CHARGE_AMOUNT..10_000_000i64) {
            let result = PaymentRequest::new(Some(amount), None, None, vec![], BTreeMap::new());
            prop_assert_eq!(result.unwrap().amount(), amount);
        }
    }
}
