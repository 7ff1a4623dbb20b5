//! Payment domain values.
//!
//! Everything here is transient: requests arrive, a provider completes the
//! payment, and a summary is rendered into the order emails.

mod errors;
mod intent;
mod money;
mod order;
mod paypal;
mod request;

pub use errors::PaymentFlowError;
pub use intent::{PaymentIntent, PaymentIntentStatus};
pub use money::{format_major_units, format_minor_units, MIN_CHARGE_AMOUNT};
pub use order::{CompletedPayment, NormalizedOrderSummary, OrderNotification, DEFAULT_CUSTOMER_NAME};
pub use paypal::{
    AmountInput, PayPalAmount, PayPalConfirmation, PayPalPayer, PayPalPayerName,
    PayPalPaymentRecord, VerificationStatus, PAYPAL_COMPLETED, PAYPAL_CURRENCY,
};
pub use request::{CustomerInfo, LineItem, PaymentRequest, DEFAULT_CURRENCY};
