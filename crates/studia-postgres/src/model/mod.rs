//! Database models for all entities in the system.
//!
//! This module contains Diesel model definitions for all database tables,
//! including structs for querying, inserting, and updating records.

mod account;
mod analysis;
mod chat;

pub use account::{Account, NewAccount, UpdateAccount};
pub use analysis::{Analysis, NewAnalysis, UpdateAnalysis};
pub use chat::{
    Chat, ChatMessage, NewChat, NewChatMessage, UpdateChatMessage, paired_deletion_ids,
};
