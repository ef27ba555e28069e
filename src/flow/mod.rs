//! Login and forwarding flow orchestration.
//!
//! One controller composes the session store, the OAuth exchanger and the
//! weight client, so the HTTP layer stays a thin binding. Each session key
//! moves through `None -> Pending -> Authenticated`; authenticated is
//! terminal.

use chrono::NaiveDate;
use tracing::info;

use crate::auth::{OAuthClient, SessionStore};
use crate::error::GatewayError;
use crate::fitbit::WeightClient;

pub struct FlowController {
    sessions: SessionStore,
    oauth: OAuthClient,
    weight: WeightClient,
}

impl FlowController {
    pub fn new(sessions: SessionStore, oauth: OAuthClient, weight: WeightClient) -> Self {
        Self {
            sessions,
            oauth,
            weight,
        }
    }

    /// `None -> Pending`: open a session and build the provider redirect
    /// URL, embedding the fresh session key as the `state` parameter.
    pub fn begin_login(&self) -> Result<String, GatewayError> {
        let session_key = self.sessions.create();
        self.oauth.authorization_url(&session_key)
    }

    /// `Pending -> Authenticated`: redeem the provider callback.
    ///
    /// The `state` round-tripped through the provider is the session key;
    /// an unknown value means a forged or stale callback. If the exchange
    /// fails the session stays pending and the provider's error propagates —
    /// recovery is a fresh login, not a retried callback, since codes are
    /// single-use.
    pub async fn complete_login(&self, code: &str, state: &str) -> Result<String, GatewayError> {
        if self.sessions.get(state).is_none() {
            return Err(GatewayError::SessionNotFound);
        }

        let access_token = self.oauth.exchange_code(code).await?;
        self.sessions.set_token(state, access_token)?;

        info!("session authenticated");
        Ok(state.to_string())
    }

    /// Guarded read, not a transition: forward one observation iff the
    /// session is authenticated. The token is cloned out of the store before
    /// the network call, so no map guard is held while the request is in
    /// flight.
    pub async fn submit_weight(
        &self,
        user_key: &str,
        weight: f64,
        date: Option<NaiveDate>,
    ) -> Result<(), GatewayError> {
        let record = self
            .sessions
            .get(user_key)
            .ok_or(GatewayError::SessionNotFound)?;
        let access_token = record.access_token.ok_or(GatewayError::Unauthorized)?;

        self.weight.log_weight(&access_token, weight, date).await
    }
}
