//! Chat request bodies and query parameters.

use serde::Deserialize;
use studia_postgres::types::MessageKind;
use uuid::Uuid;
use validator::Validate;

/// Body for `POST /chat/message`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Message text.
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Message must be between 1 and 1000 characters"
    ))]
    pub message: String,

    /// Analysis the chat belongs to.
    pub analysis_id: Uuid,
}

/// Body for `POST /chat/mindmap/{analysis_id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMindMapRequest {
    /// Custom prompt overriding the default mind-map instruction.
    #[validate(length(max = 500, message = "Prompt must be at most 500 characters"))]
    pub custom_prompt: Option<String>,
}

/// Body for `PUT /chat/{chat_id}/message/{message_id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMessageRequest {
    /// New message text.
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Message must be between 1 and 1000 characters"
    ))]
    pub content: String,
}

/// Query parameters for `GET /chat/history/{analysis_id}/messages`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesQuery {
    /// Restrict to one message kind.
    #[serde(rename = "type")]
    pub kind: Option<MessageKind>,
}
