//! SMTP email sender built on lettre.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{EmailError, EmailMessage, EmailSender};

/// Sends mail through an authenticated STARTTLS relay.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    /// Builds the transport once. No connection is opened until the first send.
    pub fn new(
        host: &str,
        username: &str,
        password: SecretString,
        from: &str,
    ) -> Result<Self, EmailError> {
        let from: Mailbox = from
            .parse()
            .map_err(|_| EmailError::InvalidAddress(from.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| EmailError::Transport(e.to_string()))?
            .credentials(Credentials::new(
                username.to_string(),
                password.expose_secret().to_string(),
            ))
            .build();

        tracing::info!(host, from = %from, "SMTP transport initialized");

        Ok(Self { transport, from })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&message.to)?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_HTML);

        if let Some(reply_to) = &message.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }

        let email = builder
            .body(message.html_body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        tracing::debug!(to = %message.to, subject = %message.subject, "Sending email via SMTP");

        self.transport
            .send(email)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_from_address() {
        let result = SmtpEmailSender::new(
            "smtp.example.com",
            "user",
            SecretString::new("pass".to_string()),
            "not an address",
        );
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }

    #[test]
    fn accepts_named_from_address() {
        let sender = SmtpEmailSender::new(
            "smtp.example.com",
            "user",
            SecretString::new("pass".to_string()),
            "Storefront Orders <orders@storefront.example>",
        )
        .unwrap();
        assert_eq!(sender.from.email.to_string(), "orders@storefront.example");
    }

    #[test]
    fn parse_mailbox_rejects_garbage() {
        assert!(parse_mailbox("a@b.com").is_ok());
        assert!(matches!(
            parse_mailbox("nope"),
            Err(EmailError::InvalidAddress(_))
        ));
    }
}
