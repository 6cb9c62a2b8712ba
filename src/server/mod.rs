//! HTTP server wiring and lifecycle.
//!
//! This module provides:
//! - Configuration read from the environment (`config`)
//! - Route definitions (`routes`)
//! - Request handlers (`handlers`)
//! - [`Server`], which wires providers and orchestration state from a
//!   [`Config`] and runs until ctrl-c or SIGTERM.

pub mod config;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::orchestrator::Orchestrator;
use crate::providers::{GeminiClient, OpenAiClient, TextProvider};
use crate::{MimirError, Result};

pub use config::Config;

/// The mimird HTTP server.
pub struct Server {
    config: Config,
    orchestrator: Arc<Orchestrator>,
}

impl Server {
    /// Wire providers and orchestration state from configuration.
    pub fn new(config: Config) -> Self {
        let primary: Arc<dyn TextProvider> = match &config.gemini_api_url {
            Some(url) => Arc::new(GeminiClient::with_endpoint(
                config.gemini_api_key.clone(),
                url,
            )),
            None => Arc::new(GeminiClient::new(config.gemini_api_key.clone())),
        };

        // The secondary exists only when its credential does.
        let secondary: Option<Arc<dyn TextProvider>> = config.openai_api_key.as_ref().map(|_| {
            let client = match &config.openai_api_url {
                Some(url) => OpenAiClient::with_endpoint(
                    config.openai_api_key.clone(),
                    config.openai_model.clone(),
                    url,
                ),
                None => {
                    OpenAiClient::new(config.openai_api_key.clone(), config.openai_model.clone())
                }
            };
            Arc::new(client) as Arc<dyn TextProvider>
        });

        let orchestrator = Arc::new(
            Orchestrator::new(primary, secondary).with_solver_force_ai(config.solver_force_gemini),
        );

        Self {
            config,
            orchestrator,
        }
    }

    /// Shared orchestration state.
    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    /// Run the HTTP server until shutdown.
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_address()
            .parse()
            .map_err(|e| MimirError::Configuration(format!("Invalid bind address: {e}")))?;

        let router = routes::create_router(self.orchestrator.clone());
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| MimirError::Configuration(format!("Failed to bind to {addr}: {e}")))?;

        info!(%addr, "mimird listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        info!("mimird stopped");
        Ok(())
    }
}

/// Resolves on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("received ctrl-c, shutting down");
        },
        () = terminate => {
            info!("received terminate signal, shutting down");
        },
    }
}
