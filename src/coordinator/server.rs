//! Coordinator server implementation
//!
//! Owns the shared application state and serves the sync endpoint over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::api::create_router;
use super::config::CoordinatorConfig;
use super::mode::ModeGate;
use super::store::StateStore;

// ============================================================================
// App State
// ============================================================================

/// Shared application state injected into request handlers
///
/// The store and gate are the only synchronization boundaries; handlers never
/// hold locks across await points of their own.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative sensor/actuator state
    pub store: Arc<StateStore>,

    /// Manual/automatic control mode gate
    pub gate: Arc<ModeGate>,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: Arc::new(StateStore::new()),
            gate: Arc::new(ModeGate::new()),
            start_time: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Coordinator Server
// ============================================================================

/// Main coordinator server
pub struct CoordinatorServer {
    config: CoordinatorConfig,
    state: AppState,
}

impl CoordinatorServer {
    /// Create a new coordinator server
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            state: AppState::new(),
        }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and configured layers
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("starting coordinator server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr,
                reason: e.to_string(),
            })?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        Ok(())
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!(
            "starting coordinator server on {} (with graceful shutdown)",
            addr
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr,
                reason: e.to_string(),
            })?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("coordinator server shutdown complete");
        Ok(())
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            bind_address: self.config.bind_address,
            cors_enabled: self.config.enable_cors,
            request_logging_enabled: self.config.enable_request_logging,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub bind_address: SocketAddr,
    pub cors_enabled: bool,
    pub request_logging_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        format!(
            "Coordinator Server\n\
             {:-<40}\n\
             Bind Address: {}\n\
             CORS: {}\n\
             Request Logging: {}",
            "",
            self.bind_address,
            if self.cors_enabled { "enabled" } else { "disabled" },
            if self.request_logging_enabled {
                "enabled"
            } else {
                "disabled"
            }
        )
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: SocketAddr, reason: String },

    #[error("server error: {0}")]
    Serve(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::mode::ControlMode;

    #[test]
    fn test_server_creation() {
        let server = CoordinatorServer::new(CoordinatorConfig::default());
        let info = server.info();

        assert_eq!(info.bind_address.port(), 5000);
        assert!(info.cors_enabled);
    }

    #[tokio::test]
    async fn test_app_state_starts_zeroed_and_manual() {
        let state = AppState::new();

        let snapshot = state.store.get_snapshot().await;
        assert_eq!(snapshot.light_level, 0);
        assert_eq!(state.gate.current(), ControlMode::Manual);
    }

    #[test]
    fn test_server_with_custom_config() {
        let config = CoordinatorConfig::builder()
            .bind_address_str("127.0.0.1:9100")
            .unwrap()
            .enable_cors(false)
            .enable_request_logging(false)
            .build();

        let server = CoordinatorServer::new(config);
        let info = server.info();

        assert_eq!(info.bind_address.port(), 9100);
        assert!(!info.cors_enabled);
        assert!(!info.request_logging_enabled);
    }
}
