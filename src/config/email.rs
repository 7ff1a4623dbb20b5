//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (SMTP relay)
///
/// Email is optional: without SMTP credentials the notifier logs a warning
/// and skips sending.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP account username, also used as the sender address
    pub smtp_username: Option<String>,

    /// SMTP account password
    pub smtp_password: Option<String>,

    /// Address that receives new-order notices
    #[serde(default = "default_business_email")]
    pub business_email: String,

    /// Display name used in the From header
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Store name used in subjects and templates
    #[serde(default = "default_store_name")]
    pub store_name: String,
}

impl EmailConfig {
    /// SMTP credentials, present only when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.smtp_username.as_deref(), self.smtp_password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// Whether email delivery is configured.
    pub fn is_enabled(&self) -> bool {
        self.credentials().is_some()
    }

    /// Get formatted "From" header value
    pub fn from_header(&self) -> Option<String> {
        self.credentials()
            .map(|(user, _)| format!("{} <{}>", self.from_name, user))
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let user_set = self.smtp_username.as_deref().is_some_and(|s| !s.is_empty());
        let pass_set = self.smtp_password.as_deref().is_some_and(|s| !s.is_empty());
        if user_set != pass_set {
            return Err(ValidationError::IncompleteSmtpCredentials);
        }
        if !self.business_email.contains('@') {
            return Err(ValidationError::InvalidBusinessEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_username: None,
            smtp_password: None,
            business_email: default_business_email(),
            from_name: default_from_name(),
            store_name: default_store_name(),
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_business_email() -> String {
    "orders@storefront.example".to_string()
}

fn default_from_name() -> String {
    "Storefront Orders".to_string()
}

fn default_store_name() -> String {
    "Storefront".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "smtp.gmail.com");
        assert_eq!(config.business_email, "orders@storefront.example");
        assert!(!config.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_header() {
        let config = EmailConfig {
            smtp_username: Some("shop@example.com".to_string()),
            smtp_password: Some("pw".to_string()),
            from_name: "Shop Orders".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.from_header().as_deref(),
            Some("Shop Orders <shop@example.com>")
        );
    }

    #[test]
    fn test_validation_half_credentials() {
        let config = EmailConfig {
            smtp_username: Some("shop@example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::IncompleteSmtpCredentials)
        ));
    }

    #[test]
    fn test_validation_invalid_business_email() {
        let config = EmailConfig {
            business_email: "invalid-email".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_password_disables_email() {
        let config = EmailConfig {
            smtp_username: Some("".to_string()),
            smtp_password: Some("".to_string()),
            ..Default::default()
        };
        assert!(!config.is_enabled());
        assert!(config.validate().is_ok());
    }
}
