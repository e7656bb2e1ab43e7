//! Chat response types.

use jiff::Timestamp;
use serde::Serialize;
use studia_postgres::model::ChatMessage;
use studia_postgres::types::{ContentType, MessageKind, MessageRole};
use studia_rig::MindMap;
use uuid::Uuid;

/// Projection of one chat message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Message identifier.
    pub id: Uuid,
    /// Author.
    pub role: MessageRole,
    /// Text content.
    pub content: String,
    /// Payload kind.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Mind-map payload, when kind is mind-map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mind_map_data: Option<serde_json::Value>,
    /// When the message was written.
    pub timestamp: Timestamp,
}

impl From<ChatMessage> for MessageView {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            role: message.role,
            content: message.content,
            kind: message.kind,
            mind_map_data: message.mind_map,
            timestamp: message.created_at.into(),
        }
    }
}

/// Response for sending a message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    /// Always `true` on success (including the degraded apology turn).
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// The assistant turn that was stored.
    pub response: MessageView,
    /// Chat the exchange belongs to.
    pub chat_id: Uuid,
}

/// Response for chat history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Messages in conversation order.
    pub messages: Vec<MessageView>,
    /// Chat identifier, absent when no chat exists yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<Uuid>,
    /// Title of the analysis the chat belongs to.
    pub analysis_title: String,
}

/// Response for kind-filtered messages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Matching messages.
    pub messages: Vec<MessageView>,
    /// Total messages in the chat, across all kinds.
    pub total_messages: usize,
}

/// Response for an edited message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// The edited message.
    pub updated_message: MessageView,
}

/// Response for mind-map generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapGenerationResponse {
    /// Always `true` on success (regeneration failure degrades to the
    /// stored map).
    pub success: bool,
    /// The mind map.
    pub mind_map_data: MindMap,
    /// Analysis title.
    pub title: String,
}

/// Chat statistics body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStatisticsBody {
    /// Total number of chats.
    pub total_chats: i64,
    /// Total number of messages.
    pub total_messages: i64,
    /// Average messages per chat.
    pub avg_messages_per_chat: f64,
}

/// One recent chat entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentChatEntry {
    /// Analysis the chat belongs to.
    pub analysis_id: Uuid,
    /// Analysis title.
    pub analysis_title: String,
    /// Analysis content type.
    pub content_type: ContentType,
    /// Number of messages in the chat.
    pub message_count: usize,
    /// Truncated text of the last message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    /// When the chat was last updated.
    pub updated_at: Timestamp,
}

/// Response for the chat statistics endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStatisticsResponse {
    /// Always `true` on success.
    pub success: bool,
    /// The statistics.
    pub statistics: ChatStatisticsBody,
    /// Most recently active chats.
    pub recent_chats: Vec<RecentChatEntry>,
}
