//! Storage configuration types.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Storage configuration for the local filesystem backend.
///
/// The platform keeps uploaded study images and exported PDF artifacts under
/// a single data root; callers address objects with keys relative to it
/// (for example `uploads/<id>.png` or `exports/<name>.pdf`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct StorageConfig {
    /// Root directory for all stored objects.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-root", env = "STORAGE_ROOT", default_value = "./data")
    )]
    pub storage_root: String,
}

impl StorageConfig {
    /// Creates a new configuration rooted at the given directory.
    pub fn new(storage_root: impl Into<String>) -> Self {
        Self {
            storage_root: storage_root.into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_root: "./data".to_string(),
        }
    }
}
