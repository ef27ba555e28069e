//! OAuth exchange and session/token binding.

pub mod oauth;
pub mod session_store;

pub use oauth::{OAuthClient, OAuthConfig};
pub use session_store::{SessionRecord, SessionState, SessionStore};
