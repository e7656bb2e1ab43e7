//! Router middleware layers.
//!
//! One canonical policy for the whole surface: CORS, a small set of security
//! headers, and request tracing. Layers are applied in the binary, outermost
//! last.

mod cors;

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub use cors::{CorsConfig, create_cors_layer};

/// Extension methods applying the canonical middleware stack to a router.
pub trait RouterExt {
    /// Applies CORS and security headers.
    fn with_security(self, cors: &CorsConfig) -> Self;

    /// Applies request tracing.
    fn with_observability(self) -> Self;
}

impl RouterExt for Router {
    fn with_security(self, cors: &CorsConfig) -> Self {
        self.layer(create_cors_layer(cors))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
    }

    fn with_observability(self) -> Self {
        self.layer(TraceLayer::new_for_http())
    }
}
