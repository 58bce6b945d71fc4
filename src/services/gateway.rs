use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::models::payload::PredictionPayload;
use crate::models::prediction::{HealthStatus, PredictionResult};

/// Client for the remote price prediction API.
pub struct PredictionGateway {
    http: Client,
    base_url: String,
    health_timeout: Duration,
    predict_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Connection Error: {}", describe(.0))]
    Transport(#[source] reqwest::Error),

    #[error("API Error: {status} - {body}")]
    Api { status: u16, body: String },
}

impl GatewayError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Client(_) => "client",
            Self::Transport(_) => "transport",
            Self::Api { .. } => "api",
        }
    }
}

impl PredictionGateway {
    pub fn new(
        base_url: &str,
        health_timeout: Duration,
        predict_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .user_agent(concat!("immo-price-predictor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            health_timeout,
            predict_timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        Self::new(
            &config.prediction_api_url,
            config.health_timeout(),
            config.predict_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/health`. Only an HTTP 200 counts as healthy.
    pub async fn check_health(&self) -> HealthStatus {
        let url = format!("{}/health", self.base_url);
        let start = Instant::now();

        let status = match self
            .http
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => match response.text().await {
                Ok(text) => HealthStatus::Healthy {
                    body: serde_json::from_str(&text)
                        .unwrap_or(serde_json::Value::String(text)),
                },
                Err(e) => HealthStatus::Unhealthy {
                    detail: describe(&e),
                },
            },
            Ok(response) => {
                let code = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                HealthStatus::Unhealthy {
                    detail: if body.is_empty() {
                        format!("HTTP {code}")
                    } else {
                        format!("HTTP {code}: {body}")
                    },
                }
            }
            Err(e) => HealthStatus::Unhealthy {
                detail: describe(&e),
            },
        };

        let elapsed = start.elapsed();
        metrics::histogram!("health_check_latency_seconds").record(elapsed.as_secs_f64());
        let outcome = if status.is_healthy() { "healthy" } else { "unhealthy" };
        metrics::counter!("health_checks_total", "outcome" => outcome).increment(1);

        match status.detail() {
            None => info!(url = %url, latency_ms = elapsed.as_millis() as u64, "Prediction API is healthy"),
            Some(detail) => warn!(url = %url, detail = %detail, "Prediction API health check failed"),
        }

        status
    }

    /// `POST {base}/predict`. A single attempt; failures are returned as-is.
    pub async fn predict(
        &self,
        payload: &PredictionPayload,
    ) -> Result<PredictionResult, GatewayError> {
        let url = format!("{}/predict", self.base_url);
        let start = Instant::now();
        metrics::counter!("prediction_requests_total").increment(1);

        let result = self.send_prediction(&url, payload).await;

        let elapsed = start.elapsed();
        metrics::histogram!("prediction_latency_seconds").record(elapsed.as_secs_f64());
        match &result {
            Ok(prediction) => info!(
                url = %url,
                latency_ms = elapsed.as_millis() as u64,
                predicted_price = prediction.predicted_price,
                "Prediction received"
            ),
            Err(e) => {
                metrics::counter!("prediction_requests_failed", "kind" => e.kind()).increment(1);
                warn!(url = %url, latency_ms = elapsed.as_millis() as u64, error = %e, "Prediction failed");
            }
        }

        result
    }

    async fn send_prediction(
        &self,
        url: &str,
        payload: &PredictionPayload,
    ) -> Result<PredictionResult, GatewayError> {
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .timeout(self.predict_timeout)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.map_err(GatewayError::Transport)?;
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<PredictionResult>()
            .await
            .map_err(GatewayError::Transport)
    }
}

/// Render a reqwest error with its full cause chain, so "connection refused"
/// or "operation timed out" is visible to the user.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = GatewayError::Api {
            status: 500,
            body: "model unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API Error: 500 - model unavailable");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let gateway = PredictionGateway::new(
            "http://localhost:8000/",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:8000");
    }
}
