//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `cors` - Origin allow-list gate
//! - `error_detail` - Internal error detail outside production

pub mod cors;
pub mod error_detail;

pub use cors::{cors_gate, AllowedOrigins};
pub use error_detail::{
    error_detail_middleware, internal_error_response, ExposeErrorDetail, InternalErrorDetail,
};
