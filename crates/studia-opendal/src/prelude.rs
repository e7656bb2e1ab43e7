//! Prelude module for convenient imports.

pub use crate::config::StorageConfig;
pub use crate::error::{StorageError, StorageResult};
pub use crate::store::{FileStore, ObjectMetadata};
