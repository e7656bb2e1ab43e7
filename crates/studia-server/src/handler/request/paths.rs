//! Path parameter types.

use serde::Deserialize;
use uuid::Uuid;

/// Path with one analysis id, e.g. `/analysis/{id}`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AnalysisPathParams {
    /// Analysis identifier.
    pub id: Uuid,
}

/// Path keyed by the owning analysis, e.g. `/chat/history/{analysis_id}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPathParams {
    /// Analysis identifier.
    pub analysis_id: Uuid,
}

/// Path addressing one message in one chat.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePathParams {
    /// Chat identifier.
    pub chat_id: Uuid,
    /// Message identifier.
    pub message_id: Uuid,
}

/// Path with an export artifact filename.
#[derive(Debug, Clone, Deserialize)]
pub struct FilenamePathParams {
    /// Artifact filename.
    pub filename: String,
}
