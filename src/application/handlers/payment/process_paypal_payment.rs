//! ProcessPayPalPaymentHandler - Command handler for a PayPal checkout the
//! browser reports as complete.

use std::sync::Arc;

use chrono::Utc;

use crate::application::notification::{NotificationOutcome, OrderNotifier};
use crate::domain::payment::{
    AmountInput, CustomerInfo, LineItem, OrderNotification, PayPalConfirmation, PayPalPaymentRecord,
    PaymentFlowError,
};
use crate::ports::PayPalOrderVerifier;

/// Command to record a PayPal payment.
#[derive(Debug, Clone, Default)]
pub struct ProcessPayPalPaymentCommand {
    pub order_id: Option<String>,
    pub payer_id: Option<String>,
    pub amount: Option<AmountInput>,
    pub customer: Option<CustomerInfo>,
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessPayPalPaymentResult {
    pub record: PayPalPaymentRecord,
    pub notification: NotificationOutcome,
}

pub struct ProcessPayPalPaymentHandler {
    verifier: Arc<dyn PayPalOrderVerifier>,
    notifier: Arc<OrderNotifier>,
}

impl ProcessPayPalPaymentHandler {
    pub fn new(verifier: Arc<dyn PayPalOrderVerifier>, notifier: Arc<OrderNotifier>) -> Self {
        Self { verifier, notifier }
    }

    pub async fn handle(
        &self,
        cmd: ProcessPayPalPaymentCommand,
    ) -> Result<ProcessPayPalPaymentResult, PaymentFlowError> {
        // 1. Validate
        let confirmation = PayPalConfirmation::new(
            cmd.order_id.as_deref(),
            cmd.payer_id.as_deref(),
            cmd.amount.as_ref(),
        )?;

        // 2. Verify
        let verification = self.verifier.verify(&confirmation).await?;

        // 3. Record and notify
        let record = PayPalPaymentRecord::completed(
            &confirmation,
            cmd.customer.as_ref(),
            verification,
            Utc::now(),
        );

        tracing::info!(
            order_id = %record.id,
            amount = %record.amount.value,
            verification = ?record.verification,
            "PayPal payment recorded"
        );

        let notification = self
            .notifier
            .notify(&OrderNotification::paypal(
                record.clone(),
                cmd.customer,
                cmd.items,
            ))
            .await;

        Ok(ProcessPayPalPaymentResult {
            record,
            notification,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::adapters::email::{RecordingEmailSender, TracingNotificationObserver};
    use crate::adapters::paypal::TrustingPayPalVerifier;
    use crate::application::notification::OrderEmailTemplates;
    use crate::domain::payment::VerificationStatus;
    use crate::ports::{PayPalError, VerificationMode};

    struct RejectingVerifier;

    #[async_trait]
    impl PayPalOrderVerifier for RejectingVerifier {
        async fn verify(
            &self,
            confirmation: &PayPalConfirmation,
        ) -> Result<VerificationStatus, PayPalError> {
            Err(PayPalError::rejected(&confirmation.order_id, "status VOIDED"))
        }

        fn mode(&self) -> VerificationMode {
            VerificationMode::Verified
        }
    }

    fn handler(
        verifier: Arc<dyn PayPalOrderVerifier>,
        sender: &RecordingEmailSender,
    ) -> ProcessPayPalPaymentHandler {
        let notifier = OrderNotifier::new(
            Some(Arc::new(sender.clone())),
            "orders@store.test",
            OrderEmailTemplates::new("Store").unwrap(),
            Arc::new(TracingNotificationObserver),
        );
        ProcessPayPalPaymentHandler::new(verifier, Arc::new(notifier))
    }

    fn command() -> ProcessPayPalPaymentCommand {
        ProcessPayPalPaymentCommand {
            order_id: Some("O1".into()),
            payer_id: Some("P1".into()),
            amount: Some(AmountInput::Number(19.99)),
            customer: Some(CustomerInfo {
                email: Some("a@b.com".into()),
                name: None,
            }),
            items: vec![],
        }
    }

    #[tokio::test]
    async fn trusting_verifier_records_unverified_completed_payment() {
        let sender = RecordingEmailSender::new();
        let result = handler(Arc::new(TrustingPayPalVerifier), &sender)
            .handle(command())
            .await
            .unwrap();

        assert_eq!(result.record.status, "COMPLETED");
        assert_eq!(result.record.amount.value, "19.99");
        assert_eq!(result.record.verification, VerificationStatus::Unverified);
        assert_eq!(result.notification.attempts(), 2);
        assert_eq!(sender.sent_to("a@b.com").len(), 1);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_verification() {
        let sender = RecordingEmailSender::new();
        let mut cmd = command();
        cmd.payer_id = None;

        let err = handler(Arc::new(RejectingVerifier), &sender)
            .handle(cmd)
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Missing required payment information");
        assert_eq!(sender.count(), 0);
    }

    #[tokio::test]
    async fn rejected_orders_are_not_recorded() {
        let sender = RecordingEmailSender::new();
        let err = handler(Arc::new(RejectingVerifier), &sender)
            .handle(command())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentFlowError::PayPalRejected { .. }));
        assert_eq!(sender.count(), 0);
    }
}
