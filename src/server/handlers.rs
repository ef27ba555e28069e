//! HTTP handlers for the relay operations.
//!
//! Each handler is a thin binding over the flow controller; all protocol
//! logic lives there.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::GatewayError;

use super::AppState;

/// Root just points at the login entry.
pub async fn root() -> Redirect {
    Redirect::temporary("/login")
}

/// Begin the login flow: open a pending session and send the browser to the
/// provider's consent screen with the session key as `state`.
pub async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect, GatewayError> {
    let url = state.flow.begin_login()?;
    Ok(Redirect::temporary(&url))
}

/// Provider callback query parameters.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// Provider callback: redeem the authorization code and hand the caller its
/// session key for later weight submissions.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackQuery>,
) -> Result<String, GatewayError> {
    let session_key = state.flow.complete_login(&params.code, &params.state).await?;
    Ok(format!("Logged in! Your user key is: {}", session_key))
}

/// Weight submission form fields.
#[derive(Debug, Deserialize)]
pub struct AddWeightForm {
    pub user_key: String,
    pub weight: f64,
}

/// Forward one weight observation for an authenticated session.
pub async fn add_weight(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddWeightForm>,
) -> Result<(StatusCode, &'static str), GatewayError> {
    state.flow.submit_weight(&form.user_key, form.weight, None).await?;
    Ok((StatusCode::CREATED, "Weight data added successfully!"))
}
