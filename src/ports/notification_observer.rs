//! Observer for best-effort order notifications.
//!
//! Order emails never fail the payment that triggered them. Their outcome is
//! reported here instead.

use super::email_sender::EmailError;

/// Which of the two order emails an outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    /// Notice to the store.
    Business,
    /// Receipt to the customer.
    Customer,
}

impl EmailKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailKind::Business => "business",
            EmailKind::Customer => "customer",
        }
    }
}

/// Why a notification sent nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No email transport is configured.
    EmailDisabled,
    /// No customer email could be resolved.
    NoCustomerEmail,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::EmailDisabled => "email not configured",
            SkipReason::NoCustomerEmail => "no customer email",
        }
    }
}

/// Port for reporting notification outcomes.
pub trait NotificationObserver: Send + Sync {
    fn skipped(&self, payment_id: &str, reason: SkipReason);

    fn delivered(&self, kind: EmailKind, payment_id: &str, recipient: &str);

    fn failed(&self, kind: EmailKind, payment_id: &str, recipient: &str, error: &EmailError);
}
