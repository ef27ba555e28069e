//! Weight Gateway Service
//!
//! OAuth2 Authorization-Code-flow relay for Fitbit: lets an external device
//! record a body-weight measurement into a user's Fitbit account without the
//! device ever holding Fitbit credentials.
//!
//! # Flow
//! - `/login` opens a session and redirects the browser to Fitbit's consent
//!   screen, with the fresh session key as the OAuth `state` value
//! - `/callback` exchanges the returned authorization code for an access
//!   token and binds it to the session key
//! - `/add_weight` forwards a weight datapoint using the bound token
//!
//! Session bindings live only in process memory and are lost on restart.

pub mod auth;
pub mod error;
pub mod fitbit;
pub mod flow;
pub mod server;

pub use auth::{OAuthClient, OAuthConfig, SessionRecord, SessionState, SessionStore};
pub use error::GatewayError;
pub use fitbit::{WeightClient, WeightConfig};
pub use flow::FlowController;
pub use server::{router, start_server, AppState};

use std::time::Duration;

/// Upper bound on any outbound provider call, so a slow provider cannot
/// hang a caller indefinitely.
pub(crate) const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);
