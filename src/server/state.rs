//! Server application state

use crate::predict::Predictor;
use crate::registry::ModelRegistry;
use crate::server::ServerConfig;
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
    pub config: ServerConfig,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, registry: Arc<ModelRegistry>) -> Self {
        Self {
            predictor: Predictor::new(registry),
            config,
            start_time: Instant::now(),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        self.predictor.registry()
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
