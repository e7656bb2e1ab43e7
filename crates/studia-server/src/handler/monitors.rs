//! Health and liveness handlers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use serde::Serialize;
use studia_postgres::PgClient;

use crate::service::ServiceState;

/// Health response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: &'static str,
    /// Human-readable message.
    pub message: &'static str,
}

/// Reports process liveness and pool pressure.
async fn health(State(pg_client): State<PgClient>) -> Json<HealthResponse> {
    let pool = pg_client.pool_status();

    tracing::debug!(
        target: "studia_server::handler::monitors",
        pool_size = pool.size,
        pool_available = pool.available,
        "health check"
    );

    Json(HealthResponse {
        status: "OK",
        message: "Studia API is running",
    })
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health))
}
