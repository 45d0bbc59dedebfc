//! HTTP prediction server
//!
//! Routes:
//!
//! - `GET  /health`
//! - `POST /api/v1/predict`
//! - `GET  /api/v1/models`
//! - `POST /api/v1/models/reload` (unless disabled)

mod api;
mod handlers;
mod state;

pub use api::PredictServer;
pub use state::AppState;

use crate::registry::ModelStatus;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind: {0}")]
    Bind(String),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Runtime server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub cors_enabled: bool,
    pub reload_endpoint: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([0, 0, 0, 0], 5001)),
            cors_enabled: true,
            reload_endpoint: true,
        }
    }
}

impl ServerConfig {
    pub fn with_address(mut self, address: SocketAddr) -> Self {
        self.address = address;
        self
    }

    pub fn without_cors(mut self) -> Self {
        self.cors_enabled = false;
        self
    }

    pub fn without_reload_endpoint(mut self) -> Self {
        self.reload_endpoint = false;
        self
    }
}

/// `GET /health` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// Model status listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelStatus>,
}

/// Body for rejected requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
