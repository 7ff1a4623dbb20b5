//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe and PayPal)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    #[serde(default)]
    pub stripe_secret_key: String,

    /// Stripe webhook signing secret, only needed by the webhook route
    pub stripe_webhook_secret: Option<String>,

    /// Base URL for the Stripe API
    #[serde(default = "default_stripe_api_base_url")]
    pub stripe_api_base_url: String,

    /// PayPal REST client id, enables server-side order verification
    pub paypal_client_id: Option<String>,

    /// PayPal REST client secret
    pub paypal_client_secret: Option<String>,

    /// PayPal environment
    #[serde(default)]
    pub paypal_mode: PayPalMode,
}

/// PayPal REST environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayPalMode {
    #[default]
    Sandbox,
    Live,
}

impl PayPalMode {
    pub fn api_base_url(&self) -> &'static str {
        match self {
            PayPalMode::Sandbox => "https://api-m.sandbox.paypal.com",
            PayPalMode::Live => "https://api-m.paypal.com",
        }
    }
}

impl PaymentConfig {
    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_secret_key.starts_with("sk_live_")
    }

    /// Whether the webhook route can verify signatures.
    pub fn webhook_enabled(&self) -> bool {
        self.stripe_webhook_secret
            .as_deref()
            .is_some_and(|s| !s.is_empty())
    }

    /// PayPal credentials, present only when both halves are configured.
    pub fn paypal_credentials(&self) -> Option<(&str, &str)> {
        match (
            self.paypal_client_id.as_deref(),
            self.paypal_client_secret.as_deref(),
        ) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }

        // Verify key prefixes for safety
        if !self.stripe_secret_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if let Some(secret) = self.stripe_webhook_secret.as_deref() {
            if !secret.is_empty() && !secret.starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }

        let id_set = self.paypal_client_id.as_deref().is_some_and(|s| !s.is_empty());
        let secret_set = self
            .paypal_client_secret
            .as_deref()
            .is_some_and(|s| !s.is_empty());
        if id_set != secret_set {
            return Err(ValidationError::IncompletePayPalCredentials);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: String::new(),
            stripe_webhook_secret: None,
            stripe_api_base_url: default_stripe_api_base_url(),
            paypal_client_id: None,
            paypal_client_secret: None,
            paypal_mode: PayPalMode::default(),
        }
    }
}

fn default_stripe_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}
