//! In-process mock of the prediction API for integration tests

#![allow(dead_code)]

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use immo_price_predictor::app_state::AppState;
use immo_price_predictor::services::gateway::PredictionGateway;

/// How the mock answers `GET /health` and `POST /predict`.
#[derive(Debug, Clone)]
pub struct MockBehavior {
    pub health_status: StatusCode,
    pub health_body: String,
    pub health_delay: Duration,
    pub predict_status: StatusCode,
    pub predict_body: String,
    pub predict_delay: Duration,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            health_status: StatusCode::OK,
            health_body: r#"{"status": "healthy", "model_loaded": true}"#.to_string(),
            health_delay: Duration::ZERO,
            predict_status: StatusCode::OK,
            predict_body: r#"{"predicted_price": 275000.5, "currency": "EUR"}"#.to_string(),
            predict_delay: Duration::ZERO,
        }
    }
}

/// A prediction request as the mock received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

pub struct MockApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockApi {
    pub fn predict_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start the mock on an ephemeral localhost port.
pub async fn start_mock_api(behavior: MockBehavior) -> MockApi {
    let requests = Arc::new(Mutex::new(Vec::new()));

    let health = behavior.clone();
    let predict = behavior;
    let recorder = requests.clone();

    let router = Router::new()
        .route(
            "/health",
            get(move || {
                let health = health.clone();
                async move {
                    if !health.health_delay.is_zero() {
                        tokio::time::sleep(health.health_delay).await;
                    }
                    (health.health_status, health.health_body)
                }
            }),
        )
        .route(
            "/predict",
            post(move |headers: HeaderMap, body: String| {
                let predict = predict.clone();
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push(RecordedRequest {
                        content_type: headers
                            .get(CONTENT_TYPE)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
                    });
                    if !predict.predict_delay.is_zero() {
                        tokio::time::sleep(predict.predict_delay).await;
                    }
                    (predict.predict_status, predict.predict_body)
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockApi {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// URL of a localhost port nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn gateway(base_url: &str) -> PredictionGateway {
    gateway_with_timeouts(base_url, Duration::from_secs(5), Duration::from_secs(5))
}

pub fn gateway_with_timeouts(
    base_url: &str,
    health_timeout: Duration,
    predict_timeout: Duration,
) -> PredictionGateway {
    PredictionGateway::new(base_url, health_timeout, predict_timeout).unwrap()
}

pub fn app_state(base_url: &str) -> AppState {
    AppState::new(gateway(base_url))
}
