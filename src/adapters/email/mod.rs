//! Email adapters.
//!
//! - `SmtpEmailSender` - lettre SMTP relay
//! - `RecordingEmailSender` - in-memory sender for tests
//! - `TracingNotificationObserver` - logs notification outcomes

mod recording_sender;
mod smtp_sender;
mod tracing_observer;

pub use recording_sender::RecordingEmailSender;
pub use smtp_sender::SmtpEmailSender;
pub use tracing_observer::TracingNotificationObserver;
