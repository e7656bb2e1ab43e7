#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod duration;
mod error;
mod video;

pub use client::{YoutubeClient, YoutubeConfig};
pub use duration::format_duration;
pub use error::{Error, Result};
pub use video::VideoSuggestion;

/// Tracing target for YouTube client operations.
pub const TRACING_TARGET: &str = "studia_youtube::client";
