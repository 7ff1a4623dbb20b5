//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::adapters::http::middleware::{internal_error_response, AllowedOrigins};
use crate::application::handlers::payment::{
    ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentResult,
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, GetPaymentIntentHandler,
    GetPaymentIntentQuery, HandleWebhookCommand, HandleWebhookHandler,
    ProcessPayPalPaymentCommand, ProcessPayPalPaymentHandler,
};
use crate::application::notification::OrderNotifier;
use crate::config::Environment;
use crate::domain::payment::PaymentFlowError;
use crate::ports::{PayPalOrderVerifier, PaymentGateway};

use super::dto::{
    ConfirmPaymentRequest, ConfirmPaymentResponse, CreatePaymentIntentRequest,
    CreatePaymentIntentResponse, ErrorResponse, HealthResponse, PayPalPaymentResponse,
    PaymentIntentResponse, PaymentIntentView, ProcessPayPalPaymentRequest, ServicesHealth,
    WebhookErrorResponse, WebhookResponse,
};

/// Header carrying the Stripe webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct PaymentAppState {
    pub gateway: Arc<dyn PaymentGateway>,
    pub paypal_verifier: Arc<dyn PayPalOrderVerifier>,
    pub notifier: Arc<OrderNotifier>,
    pub store_name: Arc<str>,
    pub service_status: ServiceStatus,
}

/// Startup facts reported by the health endpoint.
#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub environment: Environment,
    pub stripe_configured: bool,
    pub webhook_configured: bool,
    pub allowed_origins: AllowedOrigins,
}

impl ServiceStatus {
    /// Internal error detail is shown everywhere except production.
    pub fn expose_error_details(&self) -> bool {
        self.environment != Environment::Production
    }
}

impl PaymentAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.gateway.clone(), &self.store_name)
    }

    pub fn get_payment_intent_handler(&self) -> GetPaymentIntentHandler {
        GetPaymentIntentHandler::new(self.gateway.clone())
    }

    pub fn confirm_payment_handler(&self) -> ConfirmPaymentHandler {
        ConfirmPaymentHandler::new(self.gateway.clone(), self.notifier.clone())
    }

    pub fn process_paypal_payment_handler(&self) -> ProcessPayPalPaymentHandler {
        ProcessPayPalPaymentHandler::new(self.paypal_verifier.clone(), self.notifier.clone())
    }

    pub fn webhook_handler(&self) -> HandleWebhookHandler {
        HandleWebhookHandler::new(self.gateway.clone(), self.notifier.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/health - Service status snapshot
pub async fn health(State(state): State<PaymentAppState>) -> impl IntoResponse {
    let status = &state.service_status;
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        environment: status.environment.as_str(),
        services: ServicesHealth {
            stripe_configured: status.stripe_configured,
            webhook_configured: status.webhook_configured,
            email_configured: state.notifier.is_enabled(),
            paypal_verification: state.paypal_verifier.mode().as_str(),
        },
        supported_payment_methods: ["card", "paypal"],
        allowed_origins: status.allowed_origins.to_vec(),
    })
}

/// GET /api/payment-intent/:id - Payment intent snapshot
pub async fn get_payment_intent(
    State(state): State<PaymentAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.get_payment_intent_handler();
    let intent = handler
        .handle(GetPaymentIntentQuery {
            payment_intent_id: id,
        })
        .await?;

    Ok(Json(PaymentIntentResponse {
        success: true,
        payment_intent: PaymentIntentView::from(intent),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/create-payment-intent - Start a card payment
pub async fn create_payment_intent(
    State(state): State<PaymentAppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let Json(request) = payload?;

    let handler = state.create_payment_intent_handler();
    let cmd = CreatePaymentIntentCommand {
        amount: request.minor_units(),
        metadata: request.string_metadata(),
        currency: request.currency,
        customer: request.customer,
        items: request.items.unwrap_or_default(),
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(CreatePaymentIntentResponse {
        success: true,
        client_secret: result.client_secret,
        payment_intent_id: result.payment_intent_id,
    }))
}

/// POST /api/process-paypal-payment - Record a PayPal checkout
pub async fn process_paypal_payment(
    State(state): State<PaymentAppState>,
    payload: Result<Json<ProcessPayPalPaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let Json(request) = payload?;

    let handler = state.process_paypal_payment_handler();
    let cmd = ProcessPayPalPaymentCommand {
        order_id: request.order_id,
        payer_id: request.payer_id,
        amount: request.amount,
        customer: request.customer,
        items: request.items.unwrap_or_default(),
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(PayPalPaymentResponse {
        success: true,
        payment: result.record,
    }))
}

/// POST /api/confirm-payment - Confirm a card payment after the browser flow
pub async fn confirm_payment(
    State(state): State<PaymentAppState>,
    payload: Result<Json<ConfirmPaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let Json(request) = payload?;

    let handler = state.confirm_payment_handler();
    let result = handler
        .handle(ConfirmPaymentCommand {
            payment_intent_id: request.payment_intent_id,
        })
        .await?;

    let response = match result {
        ConfirmPaymentResult::Succeeded { intent, .. } => ConfirmPaymentResponse::Succeeded {
            success: true,
            payment_intent: intent.into(),
        },
        ConfirmPaymentResult::NotYetSucceeded { status } => ConfirmPaymentResponse::NotSucceeded {
            success: false,
            status: status.as_str().to_string(),
            message: "Payment has not succeeded".to_string(),
        },
    };

    Ok(Json(response))
}

/// POST /api/webhook - Handle Stripe webhook events
///
/// The body is taken as raw bytes; the signature covers the exact payload.
pub async fn handle_webhook(
    State(state): State<PaymentAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PaymentApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.webhook_handler();
    handler
        .handle(HandleWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await?;

    Ok(Json(WebhookResponse { received: true }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Fallbacks
// ════════════════════════════════════════════════════════════════════════════════

/// Unmatched routes. API paths echo the path back.
pub async fn not_found(uri: axum::http::Uri) -> Response {
    let path = uri.path();
    let body = if path == "/api" || path.starts_with("/api/") {
        serde_json::json!({
            "success": false,
            "error": "API endpoint not found",
            "path": path,
        })
    } else {
        serde_json::json!({
            "success": false,
            "error": "Not found",
        })
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts payment flow errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentApiError(PaymentFlowError);

impl From<PaymentFlowError> for PaymentApiError {
    fn from(err: PaymentFlowError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for PaymentApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PaymentFlowError::validation_with_details(
            "Invalid request body",
            rejection.body_text(),
        ))
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let message = self.0.message();
        match self.0 {
            PaymentFlowError::Validation { details, .. } => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(message).with_details(details)),
            )
                .into_response(),
            PaymentFlowError::PayPalRejected { order_id, reason } => {
                tracing::warn!(order_id = %order_id, reason = %reason, "PayPal order rejected");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(message).with_details(Some(reason))),
                )
                    .into_response()
            }
            PaymentFlowError::InvalidWebhook(_) => (
                StatusCode::BAD_REQUEST,
                Json(WebhookErrorResponse {
                    received: false,
                    error: message,
                }),
            )
                .into_response(),
            PaymentFlowError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(message))).into_response()
            }
            PaymentFlowError::Provider { provider_code, .. } => {
                tracing::error!(error = %message, code = ?provider_code, "Payment provider error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(message).with_code(provider_code)),
                )
                    .into_response()
            }
            PaymentFlowError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                internal_error_response(detail)
            }
        }
    }
}
