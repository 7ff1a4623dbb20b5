//! Origin allow-list gate.
//!
//! Runs inside `tower_http::cors::CorsLayer`, which answers preflights and
//! sets the CORS response headers. This gate only decides whether a
//! cross-origin request may reach a handler at all:
//!
//! 1. `OPTIONS` requests pass
//! 2. Requests without an `Origin` header pass (curl, server-to-server, Stripe)
//! 3. Origins on the allow-list pass
//! 4. Everything else gets `403 {success:false, error:"Not allowed by CORS", origin}`
//!
//! # Example
//!
//! ```ignore
//! let origins: AllowedOrigins = Arc::from(config.server.allowed_origins());
//! let app = Router::new()
//!     .route("/api/health", get(handler))
//!     .layer(middleware::from_fn_with_state(origins, cors_gate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Immutable allow-list shared by every request.
pub type AllowedOrigins = Arc<[String]>;

/// Rejects browser requests from origins that are not on the allow-list.
pub async fn cors_gate(
    State(allowed): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let origin = match request.headers().get(header::ORIGIN) {
        None => return next.run(request).await,
        Some(value) => value.to_str().unwrap_or_default().to_string(),
    };

    if is_allowed(&allowed, &origin) {
        return next.run(request).await;
    }

    tracing::warn!(origin = %origin, path = %request.uri().path(), "CORS blocked request");
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "success": false,
            "error": "Not allowed by CORS",
            "origin": origin,
        })),
    )
        .into_response()
}

/// Exact match against the allow-list.
pub fn is_allowed(allowed: &[String], origin: &str) -> bool {
    allowed.iter().any(|o| o == origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        let allowed: AllowedOrigins = Arc::from(vec!["https://shop.test".to_string()]);
        Router::new()
            .route("/", get(|| async { "ok" }).options(|| async { "preflight" }))
            .layer(middleware::from_fn_with_state(allowed, cors_gate))
    }

    async fn status_for(method: Method, origin: Option<&str>) -> StatusCode {
        let mut builder = axum::http::Request::builder().method(method).uri("/");
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn request_without_origin_passes() {
        assert_eq!(status_for(Method::GET, None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn listed_origin_passes() {
        assert_eq!(
            status_for(Method::GET, Some("https://shop.test")).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn unlisted_origin_is_forbidden() {
        assert_eq!(
            status_for(Method::GET, Some("https://evil.test")).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn options_always_passes() {
        assert_eq!(
            status_for(Method::OPTIONS, Some("https://evil.test")).await,
            StatusCode::OK
        );
    }

    #[test]
    fn matching_is_exact() {
        let allowed = vec!["https://shop.test".to_string()];
        assert!(is_allowed(&allowed, "https://shop.test"));
        assert!(!is_allowed(&allowed, "https://shop.test/"));
        assert!(!is_allowed(&allowed, "http://shop.test"));
    }
}
