//! HTTP server startup with graceful shutdown.

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;

use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that can occur while running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Could not bind to the configured address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// The address that could not be bound.
        address: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The server terminated with an error.
    #[error("server runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Starts the HTTP server and runs it until a shutdown signal arrives.
pub async fn serve(app: Router, config: ServerConfig) -> Result<()> {
    let server_addr = config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "failed to bind to address"
        );
        ServerError::Bind {
            address: server_addr.to_string(),
            source: err,
        }
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "server is ready and listening for connections"
    );

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "server is bound to all interfaces, ensure firewall rules are configured"
        );
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.shutdown_timeout()))
        .await?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        "server shut down gracefully"
    );

    Ok(())
}

/// Waits for SIGTERM or SIGINT/Ctrl+C.
async fn shutdown_signal(timeout: Duration) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = ctrl_c() => {
                tracing::info!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    "received SIGINT, starting graceful shutdown"
                );
            }
            _ = sigterm.recv() => {
                tracing::info!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    "received SIGTERM, starting graceful shutdown"
                );
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c().await;
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "received Ctrl+C, starting graceful shutdown"
        );
    }

    tracing::debug!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        timeout = ?timeout,
        "waiting for in-flight requests to finish"
    );
}
