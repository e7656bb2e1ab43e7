//! Message role enumeration for chat messages.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Author of a chat message.
///
/// Corresponds to the `MESSAGE_ROLE` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::MessageRole"]
#[strum(serialize_all = "snake_case")]
pub enum MessageRole {
    /// Message written by the student.
    #[db_rename = "user"]
    #[serde(rename = "user")]
    User,

    /// Message generated by the tutor.
    #[db_rename = "assistant"]
    #[serde(rename = "assistant")]
    Assistant,
}

impl MessageRole {
    /// Returns whether this is a student-authored message.
    #[inline]
    pub fn is_user(self) -> bool {
        matches!(self, MessageRole::User)
    }
}
