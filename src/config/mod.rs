use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8501").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the price prediction API, without trailing path.
    #[serde(default = "default_prediction_api_url")]
    pub prediction_api_url: String,

    /// Timeout for `GET /health` on the prediction API
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,

    /// Timeout for `POST /predict` on the prediction API
    #[serde(default = "default_predict_timeout_secs")]
    pub predict_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8501".to_string()
}

fn default_prediction_api_url() -> String {
    "https://immo-eliza-deployment-01ya.onrender.com".to_string()
}

fn default_health_timeout_secs() -> u64 {
    10
}

fn default_predict_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn predict_timeout(&self) -> Duration {
        Duration::from_secs(self.predict_timeout_secs)
    }
}
