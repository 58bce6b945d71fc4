use axum::routing::get;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use immo_price_predictor::app_state::AppState;
use immo_price_predictor::config::AppConfig;
use immo_price_predictor::routes;
use immo_price_predictor::services::gateway::PredictionGateway;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing immo-price-predictor");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = routes::metrics::install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    tracing::info!(
        url = %config.prediction_api_url,
        health_timeout_secs = config.health_timeout_secs,
        predict_timeout_secs = config.predict_timeout_secs,
        "Initializing prediction API client"
    );
    let gateway =
        PredictionGateway::from_config(&config).expect("Failed to initialize prediction API client");

    let state = AppState::new(gateway);

    let app = routes::router(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(64 * 1024));

    tracing::info!("Starting immo-price-predictor on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
