#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod store;

#[doc(hidden)]
pub mod prelude;

pub use config::StorageConfig;
pub use error::{StorageError, StorageResult};
pub use store::{FileStore, ObjectMetadata};

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "studia_opendal";
