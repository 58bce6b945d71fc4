//! Prometheus exposition of the prediction API client metrics.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;

/// Prometheus text exposition format, version 0.0.4.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Install the global recorder and describe every metric the gateway and
/// result boards emit.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

fn describe_metrics() {
    metrics::describe_counter!(
        "prediction_requests_total",
        "Prediction requests sent to the prediction API"
    );
    metrics::describe_counter!(
        "prediction_requests_failed",
        "Prediction requests that ended in an API or connection error"
    );
    metrics::describe_histogram!(
        "prediction_latency_seconds",
        metrics::Unit::Seconds,
        "Round-trip time of POST /predict"
    );
    metrics::describe_counter!(
        "health_checks_total",
        "Health checks against the prediction API, by outcome"
    );
    metrics::describe_histogram!(
        "health_check_latency_seconds",
        metrics::Unit::Seconds,
        "Round-trip time of GET /health"
    );
    metrics::describe_counter!(
        "stale_predictions_discarded",
        "Prediction responses dropped because a newer submission had started"
    );
}

/// GET /metrics
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    ([(CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], handle.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exposition_lists_described_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            describe_metrics();
            metrics::counter!("prediction_requests_total").increment(2);
        });

        let response = prometheus_metrics(State(Arc::new(handle)))
            .await
            .into_response();
        assert_eq!(response.headers()[CONTENT_TYPE], EXPOSITION_CONTENT_TYPE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("# HELP prediction_requests_total Prediction requests sent"));
        assert!(text.contains("prediction_requests_total 2"));
    }
}
