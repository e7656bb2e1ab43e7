//! Database query repositories for all entities in the system.
//!
//! This module contains repository traits implemented for pooled async
//! connections, providing high-level database operations for all entities.
//! Queries touching owned data are always scoped to the owning account.

pub mod account;
pub mod analysis;
pub mod chat;

pub use account::AccountRepository;
pub use analysis::{AnalysisFilter, AnalysisRepository, AnalysisStatistics, TopicCount};
pub use chat::{ChatRepository, ChatStatistics};
