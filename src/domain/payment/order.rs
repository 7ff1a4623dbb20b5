//! Completed payments and the summary rendered into order emails.

use super::intent::PaymentIntent;
use super::money::format_minor_units;
use super::paypal::PayPalPaymentRecord;
use super::request::{non_blank, CustomerInfo, LineItem};

/// Fallback display name when nothing better is known.
pub const DEFAULT_CUSTOMER_NAME: &str = "Customer";

/// A payment that has completed through one of the supported providers.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletedPayment {
    Card(PaymentIntent),
    PayPal(PayPalPaymentRecord),
}

impl CompletedPayment {
    pub fn payment_id(&self) -> &str {
        match self {
            CompletedPayment::Card(intent) => &intent.id,
            CompletedPayment::PayPal(record) => &record.id,
        }
    }

    /// Human-readable payment method label.
    pub fn method_label(&self) -> &'static str {
        match self {
            CompletedPayment::Card(_) => "Credit Card",
            CompletedPayment::PayPal(_) => "PayPal",
        }
    }
}

/// Request to send the order emails for a completed payment.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderNotification {
    pub payment: CompletedPayment,
    /// Customer details that take precedence over what the payment carries.
    pub customer: Option<CustomerInfo>,
    pub items: Vec<LineItem>,
    /// Pre-formatted total that replaces the payment amount.
    pub total_override: Option<String>,
}

impl OrderNotification {
    pub fn card(intent: PaymentIntent) -> Self {
        Self {
            payment: CompletedPayment::Card(intent),
            customer: None,
            items: Vec::new(),
            total_override: None,
        }
    }

    pub fn paypal(
        record: PayPalPaymentRecord,
        customer: Option<CustomerInfo>,
        items: Vec<LineItem>,
    ) -> Self {
        Self {
            payment: CompletedPayment::PayPal(record),
            customer,
            items,
            total_override: None,
        }
    }

    /// Flattens the notification into the fields the emails need.
    ///
    /// Returns `None` when no customer email can be resolved.
    pub fn summarize(&self) -> Option<NormalizedOrderSummary> {
        let override_email = self.customer.as_ref().and_then(CustomerInfo::email);
        let override_name = self.customer.as_ref().and_then(CustomerInfo::name);

        let (email, name, amount, currency) = match &self.payment {
            CompletedPayment::Card(intent) => (
                override_email
                    .or_else(|| non_blank(intent.receipt_email.as_deref()))
                    .or_else(|| intent.metadata_value("customer_email"))
                    .map(str::to_string),
                override_name
                    .or_else(|| intent.metadata_value("customer_name"))
                    .map(str::to_string),
                format_minor_units(intent.amount),
                intent.currency.to_uppercase(),
            ),
            CompletedPayment::PayPal(record) => (
                override_email
                    .or_else(|| non_blank(record.payer.email_address.as_deref()))
                    .map(str::to_string),
                override_name.map(str::to_string).or_else(|| {
                    record
                        .payer
                        .name
                        .as_ref()
                        .map(|n| n.full_name())
                        .filter(|n| !n.trim().is_empty())
                }),
                record.amount.value.clone(),
                record.amount.currency_code.clone(),
            ),
        };

        Some(NormalizedOrderSummary {
            customer_email: email?,
            customer_name: name.unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
            amount: self.total_override.clone().unwrap_or(amount),
            currency,
            payment_id: self.payment.payment_id().to_string(),
            payment_method: self.payment.method_label().to_string(),
        })
    }
}

/// Provider-independent order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOrderSummary {
    pub customer_email: String,
    pub customer_name: String,
    /// Decimal amount with two places.
    pub amount: String,
    pub currency: String,
    pub payment_id: String,
    pub payment_method: String,
}
