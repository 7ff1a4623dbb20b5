//! In-memory email sender for tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ports::{EmailError, EmailMessage, EmailSender};

/// Records every message instead of sending it.
#[derive(Default, Clone)]
pub struct RecordingEmailSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    failing_recipients: Arc<Mutex<Vec<String>>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to this address fail with a transport error. The attempt is
    /// still recorded.
    pub fn fail_for(&self, recipient: impl Into<String>) {
        lock(&self.failing_recipients).push(recipient.into());
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<EmailMessage> {
        lock(&self.sent)
            .iter()
            .filter(|m| m.to == recipient)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        lock(&self.sent).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let fails = lock(&self.failing_recipients).contains(&message.to);
        let to = message.to.clone();
        lock(&self.sent).push(message);

        if fails {
            return Err(EmailError::Transport(format!("delivery to {} refused", to)));
        }
        Ok(())
    }
}
