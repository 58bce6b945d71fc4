use std::str::FromStr;

use askama::Template;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use strum::IntoEnumIterator;
use tracing::{error, info};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::payload::build_payload;
use crate::models::prediction::HealthStatus;
use crate::models::property::{
    feature_flags, EpcScore, PropertyInput, PropertyType, Province, MAX_BATHROOMS, MAX_BEDROOMS,
    MAX_GARDEN_SURFACE, MAX_HABITABLE_SURFACE, MAX_POST_CODE_LEN, MAX_TERRACE_SURFACE,
    MAX_TOILETS,
};
use crate::models::theme::Theme;
use crate::services::render::{format_price, render_phase};
use crate::services::submission::{BoardSnapshot, Outcome, SubmissionPhase};

/// Cookie that ties a browser to its own result board.
pub const CLIENT_COOKIE: &str = "immo_client";

/// Seconds between reloads while a prediction is still pending.
const PENDING_REFRESH_SECS: u32 = 2;

/// Sample figures shown next to the form; not used by the prediction.
const SAMPLE_AVERAGE_PRICES: [(&str, f64); 5] = [
    ("Brussels", 350_000.0),
    ("Antwerp", 280_000.0),
    ("East Flanders", 250_000.0),
    ("West Flanders", 220_000.0),
    ("Flemish Brabant", 320_000.0),
];

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub theme: Option<String>,
}

impl PageQuery {
    /// An unknown theme name falls back to the default one.
    fn theme(&self) -> Theme {
        self.theme
            .as_deref()
            .and_then(|name| Theme::from_str(name).ok())
            .unwrap_or_default()
    }
}

fn page_theme(query: Result<Query<PageQuery>, QueryRejection>) -> Theme {
    query.map(|Query(query)| query.theme()).unwrap_or_default()
}

/// Client id from the request cookies, if the browser has one.
fn client_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CLIENT_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}

async fn client_snapshot(state: &AppState, client: Option<Uuid>) -> BoardSnapshot {
    let board = match client {
        Some(id) => state.boards.get(id).await,
        None => None,
    };
    match board {
        Some(board) => board.snapshot().await,
        None => BoardSnapshot::idle(),
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    theme: Theme,
    refresh_secs: Option<u32>,
    toggle_theme: Theme,
    api_base_url: String,
    health_ok: bool,
    health_detail: String,
    property_types: Vec<SelectOption>,
    provinces: Vec<SelectOption>,
    epc_scores: Vec<SelectOption>,
    size_fields: Vec<NumberField>,
    extra_fields: Vec<NumberField>,
    habitable_surface: NumberField,
    post_code: String,
    post_code_max_len: usize,
    basic_flags: Vec<CheckboxField>,
    advanced_flags: Vec<CheckboxField>,
    errors: Vec<String>,
    result_html: String,
    price_rows: Vec<PriceRow>,
}

struct SelectOption {
    value: String,
    selected: bool,
}

struct NumberField {
    name: &'static str,
    label: &'static str,
    value: u32,
    max: u32,
}

struct CheckboxField {
    name: &'static str,
    label: &'static str,
    checked: bool,
}

struct PriceRow {
    province: &'static str,
    price: String,
}

fn options<T: ToString + PartialEq>(all: impl Iterator<Item = T>, current: &T) -> Vec<SelectOption> {
    all.map(|value| SelectOption {
        selected: &value == current,
        value: value.to_string(),
    })
    .collect()
}

fn number(name: &'static str, label: &'static str, value: u32, max: u32) -> NumberField {
    NumberField {
        name,
        label,
        value,
        max,
    }
}

fn render_page(
    state: &AppState,
    theme: Theme,
    input: &PropertyInput,
    health: &HealthStatus,
    phase: &SubmissionPhase,
    errors: Vec<String>,
) -> Result<String, askama::Error> {
    let result_html = render_phase(phase)?;
    let health_detail = match health {
        HealthStatus::Healthy { body } => {
            serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
        }
        HealthStatus::Unhealthy { detail } => detail.clone(),
    };

    let (advanced, basic): (Vec<_>, Vec<_>) = feature_flags()
        .map(|flag| {
            (
                flag.is_advanced(),
                CheckboxField {
                    name: flag.form_name(),
                    label: flag.label(),
                    checked: input.flag(flag),
                },
            )
        })
        .partition(|(advanced, _)| *advanced);

    IndexTemplate {
        theme,
        refresh_secs: matches!(phase, SubmissionPhase::Submitting).then_some(PENDING_REFRESH_SECS),
        toggle_theme: theme.toggled(),
        api_base_url: state.gateway.base_url().to_string(),
        health_ok: health.is_healthy(),
        health_detail,
        property_types: options(PropertyType::iter(), &input.property_type),
        provinces: options(Province::iter(), &input.province),
        epc_scores: options(EpcScore::iter(), &input.epc_score),
        size_fields: vec![
            number("bedroom_count", "Number of Bedrooms", input.bedroom_count, MAX_BEDROOMS),
            number("bathroom_count", "Number of Bathrooms", input.bathroom_count, MAX_BATHROOMS),
        ],
        extra_fields: vec![
            number("toilet_count", "Number of Toilets", input.toilet_count, MAX_TOILETS),
            number(
                "terrace_surface",
                "Terrace Surface (m²)",
                input.terrace_surface,
                MAX_TERRACE_SURFACE,
            ),
            number(
                "garden_surface",
                "Garden Surface (m²)",
                input.garden_surface,
                MAX_GARDEN_SURFACE,
            ),
        ],
        habitable_surface: number(
            "habitable_surface",
            "Habitable Surface (m²)",
            input.habitable_surface,
            MAX_HABITABLE_SURFACE,
        ),
        post_code: input.post_code.clone(),
        post_code_max_len: MAX_POST_CODE_LEN,
        basic_flags: basic.into_iter().map(|(_, field)| field).collect(),
        advanced_flags: advanced.into_iter().map(|(_, field)| field).collect(),
        errors,
        result_html,
        price_rows: SAMPLE_AVERAGE_PRICES
            .iter()
            .map(|&(province, price)| PriceRow {
                province,
                price: format_price(price),
            })
            .collect(),
    }
    .render()
}

fn template_failure(e: askama::Error) -> StatusCode {
    error!(error = %e, "Failed to render page");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// GET / — form, API status panel and this client's latest prediction.
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Html<String>, StatusCode> {
    let theme = page_theme(query);
    let (health, snapshot) = tokio::join!(
        state.gateway.check_health(),
        client_snapshot(&state, client_id(&headers))
    );

    let input = snapshot.input.unwrap_or_default();
    render_page(&state, theme, &input, &health, &snapshot.phase, Vec::new())
        .map(Html)
        .map_err(template_failure)
}

/// POST /predict — validate the form, call the prediction API, then redirect
/// back to the page so a reload does not resubmit.
pub async fn submit_prediction(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
    headers: HeaderMap,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let theme = page_theme(query);
    let client = client_id(&headers);

    let (input, errors) = match &form {
        Ok(Form(fields)) => PropertyInput::from_form_fields(
            fields.iter().map(|(name, value)| (name.as_str(), value.as_str())),
        ),
        Err(rejection) => (PropertyInput::default(), vec![rejection.body_text()]),
    };
    if !errors.is_empty() {
        return invalid_submission(&state, client, theme, &input, errors).await;
    }
    if let Err(errors) = input.check() {
        return invalid_submission(&state, client, theme, &input, errors).await;
    }

    let client = client.unwrap_or_else(Uuid::new_v4);
    let board = state.boards.get_or_create(client).await;
    let ticket = board.begin(&input).await;
    let outcome = match state.gateway.predict(&build_payload(&input)).await {
        Ok(result) => Outcome::Success(result),
        Err(e) => Outcome::Failure(e.to_string()),
    };
    board.settle(ticket, outcome).await;

    let cookie = format!("{CLIENT_COOKIE}={client}; Path=/; HttpOnly; SameSite=Lax");
    (
        [(SET_COOKIE, cookie)],
        Redirect::to(&format!("/?theme={theme}")),
    )
        .into_response()
}

async fn invalid_submission(
    state: &AppState,
    client: Option<Uuid>,
    theme: Theme,
    input: &PropertyInput,
    errors: Vec<String>,
) -> Response {
    info!(errors = ?errors, "Rejected invalid property form");

    let (health, snapshot) = tokio::join!(
        state.gateway.check_health(),
        client_snapshot(state, client)
    );
    match render_page(state, theme, input, &health, &snapshot.phase, errors) {
        Ok(html) => (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response(),
        Err(e) => template_failure(e).into_response(),
    }
}
