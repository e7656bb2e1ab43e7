//! Agents for LLM-powered study tasks.
//!
//! - [`StudyAgent`] - turns extracted text or a diagram image into structured
//!   study material
//! - [`TutorAgent`] - answers follow-up questions about analyzed material

mod study;
mod tutor;

pub use study::StudyAgent;
pub use tutor::{TutorAgent, TutorReply};
