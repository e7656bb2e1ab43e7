#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::handler::{Error, ErrorKind, Result};

/// Tracing target for authentication operations.
pub const TRACING_TARGET_AUTHENTICATION: &str = "studia_server::authentication";

/// Tracing target for the export service.
pub const TRACING_TARGET_EXPORT: &str = "studia_server::service::export";
