use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;
use crate::models::payload::build_payload;
use crate::models::prediction::PredictionResult;
use crate::models::property::PropertyInput;

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

type ApiError = (StatusCode, Json<ApiErrorResponse>);

fn api_error(status: StatusCode, error: String, details: Vec<String>) -> ApiError {
    (status, Json(ApiErrorResponse { error, details }))
}

/// POST /api/v1/predict — JSON counterpart of the form submission.
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PropertyInput>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(input) = body.map_err(|rejection| {
        api_error(rejection.status(), rejection.body_text(), Vec::new())
    })?;

    input.check().map_err(|details| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid property input".to_string(),
            details,
        )
    })?;

    state
        .gateway
        .predict(&build_payload(&input))
        .await
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, e.to_string(), Vec::new()))
}
