//! Gateway error taxonomy.
//!
//! Provider rejections keep the provider's raw response body so callers can
//! diagnose them; configuration secrets and access tokens never appear in
//! any variant.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Session key absent from the store (forged or unknown `state` /
    /// `user_key`).
    #[error("unknown session key")]
    SessionNotFound,

    /// The session exists but no token has been bound to it yet.
    #[error("session is not authenticated")]
    Unauthorized,

    /// The provider rejected the code-for-token exchange.
    #[error("token exchange failed with status {status}")]
    TokenExchange { status: u16, body: String },

    /// The provider rejected the weight write.
    #[error("weight log failed with status {status}")]
    WeightLog { status: u16, body: String },

    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure reaching the provider (timeout, DNS, TLS).
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            GatewayError::SessionNotFound => {
                (StatusCode::NOT_FOUND, "unknown session key".to_string())
            }
            GatewayError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "session is not authenticated".to_string())
            }
            // The provider's own payload is the most useful diagnostic the
            // caller can get; pass it through verbatim.
            GatewayError::TokenExchange { body, .. } => (StatusCode::BAD_GATEWAY, body),
            GatewayError::WeightLog { body, .. } => (StatusCode::BAD_GATEWAY, body),
            GatewayError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            GatewayError::Http(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
        };
        (status, body).into_response()
    }
}
