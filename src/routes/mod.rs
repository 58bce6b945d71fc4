pub mod api;
pub mod health;
pub mod metrics;
pub mod pages;

use axum::routing::{get, post};
use axum::Router;

use crate::app_state::AppState;

/// Page, API and health routes. `/metrics` is mounted separately by the
/// binary because it needs the installed recorder.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/predict", post(pages::submit_prediction))
        .route("/api/v1/predict", post(api::predict))
        .route("/health", get(health::health_check))
        .with_state(state)
}
