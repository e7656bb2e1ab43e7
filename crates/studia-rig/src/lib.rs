#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod agent;
mod error;
pub mod material;
mod provider;

pub use agent::{StudyAgent, TutorAgent, TutorReply};
pub use error::{Error, Result};
pub use material::{Flashcard, MindMap, MindMapBranch, QuizQuestion, StudyMaterial};
pub use provider::{CompletionProvider, GeminiModel};

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "studia_rig";
