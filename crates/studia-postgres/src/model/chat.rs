//! Chat and chat message models for PostgreSQL database operations.
//!
//! A chat is a conversation thread bound 1:1 to an analysis. Messages are
//! append-mostly rows ordered by `(created_at, id)`; mind-map replies carry
//! their payload in the message's `mind_map` column.
//!
//! ## Models
//!
//! - [`Chat`] / [`NewChat`] - Conversation thread
//! - [`ChatMessage`] / [`NewChatMessage`] / [`UpdateChatMessage`] - Messages

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::{chat_messages, chats};
use crate::types::{MessageKind, MessageRole};

/// Chat model representing one conversation thread.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = chats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Chat {
    /// Unique chat identifier.
    pub id: Uuid,
    /// Analysis this chat belongs to (1:1).
    pub analysis_id: Uuid,
    /// Owning account.
    pub account_id: Uuid,
    /// Timestamp when the chat was created.
    pub created_at: Timestamp,
    /// Timestamp when the chat was last updated.
    pub updated_at: Timestamp,
}

/// Data structure for creating a new chat.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChat {
    /// Chat identifier, assigned by the caller.
    pub id: Uuid,
    /// Analysis this chat belongs to.
    pub analysis_id: Uuid,
    /// Owning account.
    pub account_id: Uuid,
}

/// Chat message model.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatMessage {
    /// Unique message identifier.
    pub id: Uuid,
    /// Chat this message belongs to.
    pub chat_id: Uuid,
    /// Message author.
    pub role: MessageRole,
    /// Message text content.
    pub content: String,
    /// Payload kind.
    pub kind: MessageKind,
    /// Mind-map payload, present when kind is [`MessageKind::MindMap`].
    pub mind_map: Option<serde_json::Value>,
    /// Timestamp when the message was created.
    pub created_at: Timestamp,
}

/// Data structure for creating a new chat message.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChatMessage {
    /// Message identifier, assigned by the caller.
    pub id: Uuid,
    /// Chat this message belongs to.
    pub chat_id: Uuid,
    /// Message author.
    pub role: MessageRole,
    /// Message text content.
    pub content: String,
    /// Payload kind.
    pub kind: MessageKind,
    /// Mind-map payload.
    pub mind_map: Option<serde_json::Value>,
}

impl NewChatMessage {
    /// Creates a plain-text message.
    pub fn text(chat_id: Uuid, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            chat_id,
            role,
            content: content.into(),
            kind: MessageKind::Text,
            mind_map: None,
        }
    }

    /// Creates a mind-map message with its payload.
    pub fn mind_map(
        chat_id: Uuid,
        role: MessageRole,
        content: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            chat_id,
            role,
            content: content.into(),
            kind: MessageKind::MindMap,
            mind_map: Some(payload),
        }
    }
}

/// Data structure for updating an existing chat message.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateChatMessage {
    /// Updated text content.
    pub content: Option<String>,
}

/// Resolves which message ids a deletion removes.
///
/// Deleting a user message that is immediately followed by an assistant
/// message removes the pair, so a question never lingers without its answer
/// and vice versa. Any other message is removed alone. Returns `None` when
/// the target message is not in the list.
pub fn paired_deletion_ids(messages: &[ChatMessage], target: Uuid) -> Option<Vec<Uuid>> {
    let index = messages.iter().position(|message| message.id == target)?;

    let mut ids = vec![target];
    if messages[index].role.is_user() {
        if let Some(next) = messages.get(index + 1) {
            if next.role == MessageRole::Assistant {
                ids.push(next.id);
            }
        }
    }

    Some(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: MessageRole) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            chat_id: Uuid::nil(),
            role,
            content: String::new(),
            kind: MessageKind::Text,
            mind_map: None,
            created_at: jiff::Timestamp::UNIX_EPOCH.into(),
        }
    }

    #[test]
    fn user_message_with_reply_deletes_pair() {
        let messages = vec![
            message(MessageRole::User),
            message(MessageRole::Assistant),
            message(MessageRole::User),
        ];

        let ids = paired_deletion_ids(&messages, messages[0].id).unwrap();
        assert_eq!(ids, vec![messages[0].id, messages[1].id]);
    }

    #[test]
    fn trailing_user_message_deletes_alone() {
        let messages = vec![
            message(MessageRole::User),
            message(MessageRole::Assistant),
            message(MessageRole::User),
        ];

        let ids = paired_deletion_ids(&messages, messages[2].id).unwrap();
        assert_eq!(ids, vec![messages[2].id]);
    }

    #[test]
    fn user_message_followed_by_user_deletes_alone() {
        let messages = vec![message(MessageRole::User), message(MessageRole::User)];

        let ids = paired_deletion_ids(&messages, messages[0].id).unwrap();
        assert_eq!(ids, vec![messages[0].id]);
    }

    #[test]
    fn assistant_message_deletes_alone() {
        let messages = vec![
            message(MessageRole::User),
            message(MessageRole::Assistant),
            message(MessageRole::User),
        ];

        let ids = paired_deletion_ids(&messages, messages[1].id).unwrap();
        assert_eq!(ids, vec![messages[1].id]);
    }

    #[test]
    fn unknown_message_resolves_to_none() {
        let messages = vec![message(MessageRole::User)];
        assert!(paired_deletion_ids(&messages, Uuid::new_v4()).is_none());
    }
}
