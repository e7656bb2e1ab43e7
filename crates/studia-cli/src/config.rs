//! CLI configuration management.
//!
//! The complete configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, shutdown
//! ├── middleware: MiddlewareConfig # CORS
//! └── service: ServiceConfig       # Postgres, storage, collaborator keys
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables; `.env` files are loaded before parsing.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::{Args, Parser};
use serde::{Deserialize, Serialize};
use studia_server::service::{MiddlewareConfig, ServiceConfig};

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "studia")]
#[command(about = "Studia study-material API server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// External service configuration (database, storage, collaborators).
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads `.env` and parses CLI arguments.
    ///
    /// `.env` is loaded first so clap's `env` fallbacks can pick values up
    /// from it.
    pub fn init() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                eprintln!("Warning: failed to load .env file: {err}");
            }
        }
        Self::parse()
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the server to.
    ///
    /// Use "127.0.0.1" for localhost only, "0.0.0.0" for all interfaces.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// TCP port number for the server to listen on.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Maximum time in seconds to wait for graceful shutdown.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the graceful shutdown timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns whether the server binds to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }
}

/// Logs the effective server configuration at startup.
pub fn log_server_config(config: &ServerConfig) {
    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        host = %config.host,
        port = config.port,
        shutdown_timeout_secs = config.shutdown_timeout,
        "server configuration loaded"
    );
}
