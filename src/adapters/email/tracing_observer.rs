//! Notification observer that writes outcomes to the log.

use crate::ports::{EmailError, EmailKind, NotificationObserver, SkipReason};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationObserver;

impl NotificationObserver for TracingNotificationObserver {
    fn skipped(&self, payment_id: &str, reason: SkipReason) {
        match reason {
            SkipReason::EmailDisabled => tracing::warn!(
                payment_id,
                "Email not configured, skipping order notification"
            ),
            SkipReason::NoCustomerEmail => tracing::info!(
                payment_id,
                "No customer email available, skipping order notification"
            ),
        }
    }

    fn delivered(&self, kind: EmailKind, payment_id: &str, recipient: &str) {
        tracing::info!(
            payment_id,
            email = kind.as_str(),
            recipient,
            "Order email sent"
        );
    }

    fn failed(&self, kind: EmailKind, payment_id: &str, recipient: &str, error: &EmailError) {
        tracing::error!(
            payment_id,
            email = kind.as_str(),
            recipient,
            error = %error,
            "Failed to send order email"
        );
    }
}
