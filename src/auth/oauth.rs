//! Fitbit OAuth2 authorization-code exchange.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::PROVIDER_TIMEOUT;

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Fitbit OAuth configuration.
    ///
    /// Requires environment variables FITBIT_CLIENT_ID and
    /// FITBIT_CLIENT_SECRET. Endpoints default to the public Fitbit API and
    /// can be overridden with FITBIT_AUTH_URL / FITBIT_TOKEN_URL. The
    /// redirect URI is REDIRECT_URL if set, otherwise BASE_URL + `/callback`;
    /// the same string is sent on both OAuth legs, as the provider requires.
    pub fn fitbit() -> Result<Self, GatewayError> {
        let client_id = std::env::var("FITBIT_CLIENT_ID").map_err(|_| {
            GatewayError::Config("FITBIT_CLIENT_ID environment variable not set".to_string())
        })?;
        let client_secret = std::env::var("FITBIT_CLIENT_SECRET").map_err(|_| {
            GatewayError::Config("FITBIT_CLIENT_SECRET environment variable not set".to_string())
        })?;

        let auth_url = std::env::var("FITBIT_AUTH_URL")
            .unwrap_or_else(|_| "https://www.fitbit.com/oauth2/authorize".to_string());
        let token_url = std::env::var("FITBIT_TOKEN_URL")
            .unwrap_or_else(|_| "https://www.fitbit.com/oauth2/token".to_string());

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| "https://localhost:5000".to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        let redirect_uri = std::env::var("REDIRECT_URL")
            .unwrap_or_else(|_| format!("{}/callback", base_url));

        Ok(Self {
            client_id,
            client_secret,
            auth_url,
            token_url,
            redirect_uri,
            scopes: vec!["weight".to_string()],
        })
    }
}

/// OAuth client for the code-for-token exchange.
pub struct OAuthClient {
    config: OAuthConfig,
    http_client: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()?;

        Ok(Self { config, http_client })
    }

    /// Build the provider authorization URL for a login beginning with
    /// `state` (the caller's fresh session key).
    pub fn authorization_url(&self, state: &str) -> Result<String, GatewayError> {
        let mut url = url::Url::parse(&self.config.auth_url)
            .map_err(|e| GatewayError::Config(format!("invalid authorization URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state);

        Ok(url.to_string())
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Codes are single-use by provider contract: a second exchange with the
    /// same code is expected to fail, and that failure is surfaced rather
    /// than suppressed.
    pub async fn exchange_code(&self, code: &str) -> Result<String, GatewayError> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let form_params = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code", code),
        ];

        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.config.client_id, self.config.client_secret
        ));

        debug!("exchanging authorization code at {}", self.config.token_url);

        let response = self
            .http_client
            .post(&self.config.token_url)
            .header("Authorization", format!("Basic {}", basic))
            .form(&form_params)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!("token exchange rejected with status {}", status);
            return Err(GatewayError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let token_response: TokenResponse =
            serde_json::from_str(&body).map_err(|_| GatewayError::TokenExchange {
                status: status.as_u16(),
                body,
            })?;

        Ok(token_response.access_token)
    }
}
