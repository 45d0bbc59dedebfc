//! API router and server setup
//!
//! Configures axum routes and runs the HTTP server.

use crate::registry::ModelRegistry;
use crate::server::{
    handlers::{health_check, list_models, predict, reload_models},
    state::AppState,
    Result, ServerConfig, ServerError,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Prediction server over a shared model registry
pub struct PredictServer {
    config: ServerConfig,
    state: AppState,
}

impl PredictServer {
    /// Create a new prediction server
    pub fn new(config: ServerConfig, registry: Arc<ModelRegistry>) -> Self {
        let state = AppState::new(config.clone(), registry);
        Self { config, state }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let mut app = Router::new()
            // Health check
            .route("/health", get(health_check))
            // Prediction
            .route("/api/v1/predict", post(predict))
            // Models
            .route("/api/v1/models", get(list_models));

        if self.config.reload_endpoint {
            app = app.route("/api/v1/models/reload", post(reload_models));
        }

        let mut app = app
            .with_state(self.state.clone())
            // Tracing
            .layer(TraceLayer::new_for_http());

        // Add CORS if enabled
        if self.config.cors_enabled {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let addr = self.config.address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("{addr}: {e}")))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local = listener.local_addr()?;
        tracing::info!(address = %local, "weldpredict server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Io)?;

        tracing::info!("server stopped");
        Ok(())
    }

    /// Get the configured address
    pub fn address(&self) -> SocketAddr {
        self.config.address
    }

    /// Get the current state (for testing)
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}

// =============================================================================
// Tests
// =============================================================================
