//! Fitbit weight-log API client.

use chrono::{Local, NaiveDate};
use tracing::warn;

use crate::error::GatewayError;
use crate::PROVIDER_TIMEOUT;

/// Weight-log endpoint configuration.
#[derive(Debug, Clone)]
pub struct WeightConfig {
    pub weight_log_url: String,
}

impl WeightConfig {
    /// Fitbit weight-log endpoint, overridable with FITBIT_WEIGHT_LOG_URL.
    pub fn fitbit() -> Self {
        let weight_log_url = std::env::var("FITBIT_WEIGHT_LOG_URL").unwrap_or_else(|_| {
            "https://api.fitbit.com/1/user/-/body/log/weight.json".to_string()
        });

        Self { weight_log_url }
    }
}

/// Client for submitting weight observations on behalf of an authenticated
/// user.
pub struct WeightClient {
    config: WeightConfig,
    http_client: reqwest::Client,
}

impl WeightClient {
    pub fn new(config: WeightConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()?;

        Ok(Self { config, http_client })
    }

    /// Log one weight observation.
    ///
    /// `date` defaults to the current local calendar date. The provider
    /// signals creation with HTTP 201; any other status is surfaced with the
    /// provider's response body. One attempt, no retry — resubmission is the
    /// caller's decision.
    pub async fn log_weight(
        &self,
        access_token: &str,
        weight: f64,
        date: Option<NaiveDate>,
    ) -> Result<(), GatewayError> {
        let date = date.unwrap_or_else(|| Local::now().date_naive());

        let form_params = [
            ("date", date.format("%Y-%m-%d").to_string()),
            ("weight", weight.to_string()),
        ];

        let response = self
            .http_client
            .post(&self.config.weight_log_url)
            .header("Authorization", format!("Bearer {}", access_token))
            .form(&form_params)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            warn!("weight log rejected with status {}", status);
            return Err(GatewayError::WeightLog {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn logs_weight_with_bearer_token_and_current_date() {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/1/user/-/body/log/weight.json")
            .match_header("authorization", "Bearer tok123")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("weight".into(), "82.5".into()),
                Matcher::UrlEncoded("date".into(), today),
            ]))
            .with_status(201)
            .with_body(r#"{"weightLog":{"logId":1}}"#)
            .create_async()
            .await;

        let client = WeightClient::new(WeightConfig {
            weight_log_url: server.url() + "/1/user/-/body/log/weight.json",
        })
        .unwrap();

        client.log_weight("tok123", 82.5, None).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn explicit_date_is_forwarded_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/weight")
            .match_body(Matcher::UrlEncoded("date".into(), "2024-02-29".into()))
            .with_status(201)
            .create_async()
            .await;

        let client = WeightClient::new(WeightConfig {
            weight_log_url: server.url() + "/weight",
        })
        .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        client.log_weight("tok123", 70.0, Some(date)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_created_status_is_a_forward_error() {
        let provider_body = r#"{"errors":[{"errorType":"expired_token"}]}"#;
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/weight")
            .with_status(401)
            .with_body(provider_body)
            .create_async()
            .await;

        let client = WeightClient::new(WeightConfig {
            weight_log_url: server.url() + "/weight",
        })
        .unwrap();

        let err = client.log_weight("stale", 82.5, None).await.unwrap_err();
        match err {
            GatewayError::WeightLog { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, provider_body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
