//! All axum [`Router`]s with their handlers.
//!
//! One canonical router assembly: every handler module contributes a
//! `routes()` router, merged here under the `/api` prefix; the health
//! endpoint stays at the root. Authentication is enforced per handler via
//! the [`AuthState`] extractor, so public endpoints (register, login,
//! download, health) are simply handlers that do not extract it.
//!
//! [`Router`]: axum::Router
//! [`AuthState`]: crate::extract::AuthState

mod accounts;
mod analyses;
mod authentication;
mod chat;
pub(crate) mod error;
mod exports;
mod monitors;
pub mod request;
pub mod response;
mod uploads;
mod utils;

use axum::Router;
use axum::response::IntoResponse;

pub use crate::handler::error::{Error, ErrorKind, FieldError, Result};

use crate::service::ServiceState;

/// Fallback for unknown routes.
async fn not_found() -> impl IntoResponse {
    ErrorKind::NotFound.with_message("Route not found")
}

/// Returns the complete application router.
pub fn routes(state: ServiceState) -> Router {
    let api = Router::new()
        .merge(authentication::routes())
        .merge(accounts::routes())
        .merge(uploads::routes())
        .merge(analyses::routes())
        .merge(chat::routes())
        .merge(exports::routes());

    Router::new()
        .nest("/api", api)
        .merge(monitors::routes())
        .fallback(not_found)
        .with_state(state)
}
