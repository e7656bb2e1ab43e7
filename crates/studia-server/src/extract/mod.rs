//! Custom axum extractors.

mod auth;
mod validated_json;

pub use auth::{AuthClaims, AuthKeys, AuthState};
pub use validated_json::ValidateJson;
