//! Service layer: configuration, shared state, and the export service.

mod auth_hasher;
mod config;
mod export;
mod state;

pub use auth_hasher::AuthHasher;
pub use config::{MiddlewareConfig, ServiceConfig};
pub use export::{
    ExportArtifact, ExportError, ExportResult, ExportService, StoredExport, download_url_of,
    validate_filename,
};
pub use state::ServiceState;
