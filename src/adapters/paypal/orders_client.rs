//! PayPal Orders API client.
//!
//! Obtains an OAuth token with the client-credentials grant and checks the
//! reported order with `GET /v2/checkout/orders/{id}`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::payment::{
    PayPalConfirmation, VerificationStatus, PAYPAL_COMPLETED, PAYPAL_CURRENCY,
};
use crate::ports::{PayPalError, PayPalOrderVerifier, VerificationMode};

/// Seconds shaved off the token lifetime before it is refreshed.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// PayPal REST credentials and endpoint.
#[derive(Clone)]
pub struct PayPalClientConfig {
    client_id: String,
    client_secret: SecretString,
    api_base_url: String,
}

impl PayPalClientConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

struct CachedToken {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    status: String,
    payer: Option<OrderPayer>,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Deserialize)]
struct OrderPayer {
    payer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    amount: Option<OrderAmount>,
}

#[derive(Debug, Deserialize)]
struct OrderAmount {
    currency_code: String,
    value: String,
}

/// Verifies PayPal orders against the PayPal REST API.
pub struct PayPalOrdersClient {
    config: PayPalClientConfig,
    http_client: reqwest::Client,
    token: RwLock<Option<CachedToken>>,
}

impl PayPalOrdersClient {
    pub fn new(config: PayPalClientConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            token: RwLock::new(None),
        }
    }

    /// Returns a cached access token or requests a new one.
    async fn access_token(&self) -> Result<SecretString, PayPalError> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Utc::now() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let url = format!("{}/v1/oauth2/token", self.config.api_base_url);
        let response = self
            .http_client
            .post(&url)
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PayPalError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "PayPal token request failed");
            return Err(PayPalError::Authentication(format!("status {}", status)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PayPalError::Authentication(format!("invalid token response: {}", e)))?;

        let access_token = SecretString::new(token.access_token);
        let expires_at = Utc::now() + Duration::seconds(token.expires_in - TOKEN_EXPIRY_MARGIN_SECS);
        *self.token.write().await = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at,
        });

        Ok(access_token)
    }

    /// `{base}/v2/checkout/orders/{id}` with the id as a single encoded segment.
    fn order_url(&self, order_id: &str) -> Result<reqwest::Url, PayPalError> {
        if matches!(order_id, "" | "." | "..") {
            return Err(PayPalError::rejected(order_id, "order not found"));
        }

        let mut url = reqwest::Url::parse(&self.config.api_base_url)
            .map_err(|e| PayPalError::Network(format!("invalid PayPal API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PayPalError::Network("PayPal API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v2", "checkout", "orders", order_id]);
        Ok(url)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<OrderResponse, PayPalError> {
        let url = self.order_url(order_id)?;
        let token = self.access_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| PayPalError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PayPalError::rejected(order_id, "order not found"));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(order_id, status = %status, body = %body, "PayPal order lookup failed");
            return Err(PayPalError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| PayPalError::Api {
            status: status.as_u16(),
            message: format!("invalid order response: {}", e),
        })
    }
}

/// Checks a fetched order against what the browser reported.
///
/// Only captured orders count; an `APPROVED` order has not moved money yet.
fn check_order(order: &OrderResponse, confirmation: &PayPalConfirmation) -> Result<(), PayPalError> {
    if order.status != PAYPAL_COMPLETED {
        return Err(PayPalError::rejected(
            &order.id,
            format!("order status is {}", order.status),
        ));
    }

    let payer_id = order.payer.as_ref().and_then(|p| p.payer_id.as_deref());
    if payer_id != Some(confirmation.payer_id.as_str()) {
        return Err(PayPalError::rejected(&order.id, "payer does not match"));
    }

    let amount = order
        .purchase_units
        .first()
        .and_then(|unit| unit.amount.as_ref())
        .ok_or_else(|| PayPalError::rejected(&order.id, "order carries no amount"))?;

    if !amount.currency_code.eq_ignore_ascii_case(PAYPAL_CURRENCY) {
        return Err(PayPalError::rejected(
            &order.id,
            format!("currency is {}", amount.currency_code),
        ));
    }

    let value = amount
        .value
        .parse::<f64>()
        .map_err(|_| PayPalError::rejected(&order.id, "order amount is not a number"))?;
    if (value - confirmation.amount).abs() >= 0.005 {
        return Err(PayPalError::rejected(&order.id, "amount does not match"));
    }

    Ok(())
}

#[async_trait]
impl PayPalOrderVerifier for PayPalOrdersClient {
    async fn verify(
        &self,
        confirmation: &PayPalConfirmation,
    ) -> Result<VerificationStatus, PayPalError> {
        let order = self.fetch_order(&confirmation.order_id).await?;

        if let Err(err) = check_order(&order, confirmation) {
            tracing::warn!(
                order_id = %confirmation.order_id,
                error = %err,
                "PayPal order verification failed"
            );
            return Err(err);
        }

        tracing::info!(
            order_id = %confirmation.order_id,
            status = %order.status,
            "PayPal order verified"
        );
        Ok(VerificationStatus::Verified)
    }

    fn mode(&self) -> VerificationMode {
        VerificationMode::Verified
    }
}
