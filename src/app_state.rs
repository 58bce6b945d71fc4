use std::sync::Arc;

use crate::services::{gateway::PredictionGateway, submission::ClientBoards};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<PredictionGateway>,
    pub boards: Arc<ClientBoards>,
}

impl AppState {
    pub fn new(gateway: PredictionGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            boards: Arc::new(ClientBoards::new()),
        }
    }
}
