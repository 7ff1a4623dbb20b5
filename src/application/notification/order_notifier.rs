//! OrderNotifier - Sends the business notice and customer receipt for a
//! completed payment.
//!
//! Notification is best-effort: `notify` never fails. Every outcome is
//! reported to the injected `NotificationObserver` and returned to the caller
//! for inspection.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::payment::OrderNotification;
use crate::ports::{
    EmailError, EmailKind, EmailMessage, EmailSender, NotificationObserver, SkipReason,
};

use super::templates::{OrderEmailTemplates, RenderedEmail};

pub type DeliveryResult = Result<(), EmailError>;

/// What a notification did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Nothing was sent.
    Skipped { reason: SkipReason },
    /// Both emails were attempted.
    Attempted {
        business: DeliveryResult,
        customer: DeliveryResult,
    },
}

impl NotificationOutcome {
    pub fn attempts(&self) -> usize {
        match self {
            NotificationOutcome::Skipped { .. } => 0,
            NotificationOutcome::Attempted { .. } => 2,
        }
    }
}

/// Sends order emails.
pub struct OrderNotifier {
    sender: Option<Arc<dyn EmailSender>>,
    business_email: String,
    templates: OrderEmailTemplates,
    observer: Arc<dyn NotificationObserver>,
}

impl OrderNotifier {
    /// `sender` is `None` when email is not configured; every notification
    /// is then skipped.
    pub fn new(
        sender: Option<Arc<dyn EmailSender>>,
        business_email: impl Into<String>,
        templates: OrderEmailTemplates,
        observer: Arc<dyn NotificationObserver>,
    ) -> Self {
        Self {
            sender,
            business_email: business_email.into(),
            templates,
            observer,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    pub async fn notify(&self, notification: &OrderNotification) -> NotificationOutcome {
        let payment_id = notification.payment.payment_id();

        let Some(sender) = self.sender.as_ref() else {
            return self.skip(payment_id, SkipReason::EmailDisabled);
        };

        let Some(summary) = notification.summarize() else {
            return self.skip(payment_id, SkipReason::NoCustomerEmail);
        };

        let now = Utc::now();
        let business = self
            .templates
            .render_business(&summary, &notification.items, now)
            .map(|email| message(&self.business_email, email, Some(&summary.customer_email)));
        let customer = self
            .templates
            .render_customer(&summary, &notification.items, now)
            .map(|email| message(&summary.customer_email, email, Some(&self.business_email)));

        let (business, customer) = futures::join!(
            deliver(sender.as_ref(), business),
            deliver(sender.as_ref(), customer)
        );

        self.report(EmailKind::Business, payment_id, &self.business_email, &business);
        self.report(EmailKind::Customer, payment_id, &summary.customer_email, &customer);

        NotificationOutcome::Attempted { business, customer }
    }

    fn skip(&self, payment_id: &str, reason: SkipReason) -> NotificationOutcome {
        self.observer.skipped(payment_id, reason);
        NotificationOutcome::Skipped { reason }
    }

    fn report(&self, kind: EmailKind, payment_id: &str, recipient: &str, result: &DeliveryResult) {
        match result {
            Ok(()) => self.observer.delivered(kind, payment_id, recipient),
            Err(err) => self.observer.failed(kind, payment_id, recipient, err),
        }
    }
}

fn message(to: &str, email: RenderedEmail, reply_to: Option<&str>) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: email.subject,
        html_body: email.html,
        reply_to: reply_to.map(str::to_string),
    }
}

async fn deliver(
    sender: &dyn EmailSender,
    message: Result<EmailMessage, EmailError>,
) -> DeliveryResult {
    sender.send(message?).await
}
