#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod annotation;
mod classify;
mod client;
mod error;

pub use annotation::{ImageAnnotation, LabelAnnotation, ObjectAnnotation, TextExtraction};
pub use classify::ContentClass;
pub use client::{VisionClient, VisionConfig};
pub use error::{Error, Result};

/// Tracing target for vision client operations.
pub const TRACING_TARGET: &str = "studia_vision::client";

/// Tracing target for content classification.
pub const TRACING_TARGET_CLASSIFY: &str = "studia_vision::classify";
