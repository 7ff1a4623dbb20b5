//! Storefront payments server.

use std::process::ExitCode;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storefront_payments::adapters::email::{SmtpEmailSender, TracingNotificationObserver};
use storefront_payments::adapters::http::{build_app, PaymentAppState, ServiceStatus};
use storefront_payments::adapters::paypal::{
    PayPalClientConfig, PayPalOrdersClient, TrustingPayPalVerifier,
};
use storefront_payments::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use storefront_payments::application::{OrderEmailTemplates, OrderNotifier};
use storefront_payments::config::AppConfig;
use storefront_payments::ports::{EmailSender, PayPalOrderVerifier};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info", false);
            tracing::error!(error = %err, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.server.log_level, config.is_production());

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Server terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config)?;
    let app = build_app(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = config.server.environment.as_str(),
        "Storefront payments listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_state(config: &AppConfig) -> Result<PaymentAppState, Box<dyn std::error::Error>> {
    let payment = &config.payment;

    let webhook_configured = payment.webhook_enabled();
    let mut stripe = StripeConfig::new(payment.stripe_secret_key.clone())
        .with_base_url(payment.stripe_api_base_url.clone())
        .with_require_livemode(payment.is_live_mode());
    match payment.stripe_webhook_secret.as_deref() {
        Some(secret) if webhook_configured => stripe = stripe.with_webhook_secret(secret),
        _ => tracing::warn!(
            "Stripe webhook secret not configured; webhook deliveries will be rejected"
        ),
    }
    let gateway = Arc::new(StripePaymentAdapter::new(stripe));

    let paypal_verifier: Arc<dyn PayPalOrderVerifier> = match payment.paypal_credentials() {
        Some((client_id, secret)) => {
            tracing::info!(mode = ?payment.paypal_mode, "PayPal order verification enabled");
            Arc::new(PayPalOrdersClient::new(PayPalClientConfig::new(
                client_id,
                secret,
                payment.paypal_mode.api_base_url(),
            )))
        }
        None => {
            tracing::warn!("PayPal credentials not configured; PayPal payments are trusted as reported");
            Arc::new(TrustingPayPalVerifier::new())
        }
    };

    let email = &config.email;
    let sender: Option<Arc<dyn EmailSender>> = match (email.credentials(), email.from_header()) {
        (Some((username, password)), Some(from)) => Some(Arc::new(SmtpEmailSender::new(
            &email.smtp_host,
            username,
            SecretString::new(password.to_string()),
            &from,
        )?)),
        _ => {
            tracing::warn!("SMTP credentials not configured; order emails are disabled");
            None
        }
    };

    let notifier = OrderNotifier::new(
        sender,
        email.business_email.clone(),
        OrderEmailTemplates::new(email.store_name.clone())?,
        Arc::new(TracingNotificationObserver),
    );

    Ok(PaymentAppState {
        gateway,
        paypal_verifier,
        notifier: Arc::new(notifier),
        store_name: Arc::from(email.store_name.as_str()),
        service_status: ServiceStatus {
            environment: config.server.environment,
            stripe_configured: !payment.stripe_secret_key.is_empty(),
            webhook_configured,
            allowed_origins: Arc::from(config.server.allowed_origins()),
        },
    })
}

/// `server.log_level` is a complete filter directive; `RUST_LOG` overrides it.
fn init_tracing(directives: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter(directives));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(err) = result {
        eprintln!("tracing already initialized: {}", err);
    }
}

fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("invalid log_level {:?}, falling back to info: {}", directives, err);
        EnvFilter::new("info")
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
