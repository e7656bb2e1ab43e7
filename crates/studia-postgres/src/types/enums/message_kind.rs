//! Message kind enumeration for chat messages.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Payload kind of a chat message.
///
/// Corresponds to the `MESSAGE_KIND` PostgreSQL enum. Mind-map messages carry
/// their payload in the message's `mind_map` column.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::MessageKind"]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    /// Plain text message.
    #[db_rename = "text"]
    #[serde(rename = "text")]
    Text,

    /// Mind-map message with an embedded tree payload.
    #[db_rename = "mind_map"]
    #[serde(rename = "mindmap")]
    MindMap,
}
