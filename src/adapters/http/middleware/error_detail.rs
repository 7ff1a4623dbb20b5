//! Internal error detail exposure.
//!
//! Handlers and the panic catcher never put internal detail in the response
//! body. They attach an [`InternalErrorDetail`] extension instead; this
//! middleware copies it into the body as `message` when detail exposure is
//! enabled (every environment except production).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Underlying cause of a 500 response.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// Whether internal error detail is added to response bodies.
#[derive(Debug, Clone, Copy)]
pub struct ExposeErrorDetail(pub bool);

/// Body shared by every internal error response.
pub fn internal_error_response(detail: impl Into<String>) -> Response {
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": "Internal server error",
        })),
    )
        .into_response();
    response
        .extensions_mut()
        .insert(InternalErrorDetail(detail.into()));
    response
}

pub async fn error_detail_middleware(
    State(ExposeErrorDetail(expose)): State<ExposeErrorDetail>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !expose {
        return response;
    }
    let Some(InternalErrorDetail(detail)) = response.extensions().get::<InternalErrorDetail>().cloned()
    else {
        return response;
    };

    let status = response.status();
    let mut rebuilt = (
        status,
        Json(json!({
            "success": false,
            "error": "Internal server error",
            "message": detail,
        })),
    )
        .into_response();
    rebuilt
        .extensions_mut()
        .insert(InternalErrorDetail(detail));
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn body_for(expose: bool) -> serde_json::Value {
        let app = Router::new()
            .route("/", get(|| async { internal_error_response("db exploded") }))
            .layer(middleware::from_fn_with_state(
                ExposeErrorDetail(expose),
                error_detail_middleware,
            ));

        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn detail_is_added_when_exposed() {
        let body = body_for(true).await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "db exploded");
    }

    #[tokio::test]
    async fn detail_is_hidden_otherwise() {
        let body = body_for(false).await;
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("message").is_none());
    }
}
