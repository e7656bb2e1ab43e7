//! Chat handlers: message exchange, history, and mind-map generation.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use studia_postgres::PgClient;
use studia_postgres::model::NewChatMessage;
use studia_postgres::query::{AnalysisRepository, ChatRepository};
use studia_postgres::types::MessageRole;
use studia_rig::TutorAgent;

use crate::extract::{AuthState, ValidateJson};
use crate::handler::request::{
    ChatPathParams, GenerateMindMapRequest, MessagePathParams, MessagesQuery, SendMessageRequest,
    UpdateMessageRequest,
};
use crate::handler::response::{
    AckResponse, ChatHistoryResponse, ChatStatisticsBody, ChatStatisticsResponse, MessageView,
    MessagesResponse, MindMapGenerationResponse, RecentChatEntry, SendMessageResponse,
    UpdateMessageResponse, material_of,
};
use crate::handler::utils::to_jsonb;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for chat operations.
const TRACING_TARGET: &str = "studia_server::handler::chat";

/// Assistant turn stored when generation fails.
const APOLOGY_MESSAGE: &str =
    "I apologize, but I encountered an error while processing your question. Please try again.";

/// Number of chats returned by the statistics endpoint.
const RECENT_CHAT_LIMIT: i64 = 5;

/// Characters kept of the last message in recent-chat previews.
const PREVIEW_LEN: usize = 100;

/// Sends a message and stores the assistant reply.
///
/// The user turn is appended first, unconditionally: even when generation
/// fails, the conversation keeps the question, a fixed apology is stored as
/// the assistant turn, and the request still reports success.
#[tracing::instrument(skip_all, fields(analysis_id = %request.analysis_id))]
async fn send_message(
    State(pg_client): State<PgClient>,
    State(tutor_agent): State<Arc<TutorAgent>>,
    AuthState(claims): AuthState,
    ValidateJson(request): ValidateJson<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let analysis = conn
        .find_analysis(request.analysis_id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    let chat = conn
        .find_or_create_chat(request.analysis_id, claims.account_id)
        .await?;

    conn.append_message(NewChatMessage::text(
        chat.id,
        MessageRole::User,
        request.message.clone(),
    ))
    .await?;

    let material = material_of(&analysis);
    let reply = tutor_agent
        .answer(&request.message, &material, &analysis.extracted_text)
        .await;

    let assistant_turn = match reply {
        Ok(reply) => match reply.mind_map {
            Some(ref mind_map) => NewChatMessage::mind_map(
                chat.id,
                MessageRole::Assistant,
                reply.content.clone(),
                to_jsonb(mind_map),
            ),
            None => NewChatMessage::text(chat.id, MessageRole::Assistant, reply.content),
        },
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "tutor reply generation failed, storing apology turn"
            );
            NewChatMessage::text(chat.id, MessageRole::Assistant, APOLOGY_MESSAGE)
        }
    };

    let stored = conn.append_message(assistant_turn).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        chat_id = %chat.id,
        kind = %stored.kind,
        "message exchange stored"
    );

    Ok(Json(SendMessageResponse {
        success: true,
        message: "Message sent successfully".to_string(),
        response: stored.into(),
        chat_id: chat.id,
    }))
}

/// Returns the full chat history for an analysis.
async fn chat_history(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<ChatPathParams>,
) -> Result<Json<ChatHistoryResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let analysis = conn
        .find_analysis(params.analysis_id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    let chat = conn
        .find_chat_by_analysis(params.analysis_id, claims.account_id)
        .await?;

    let (chat_id, messages) = match chat {
        Some(chat) => {
            let messages = conn.list_messages(chat.id).await?;
            (Some(chat.id), messages)
        }
        None => (None, Vec::new()),
    };

    Ok(Json(ChatHistoryResponse {
        success: true,
        messages: messages.into_iter().map(Into::into).collect(),
        chat_id,
        analysis_title: analysis.title,
    }))
}

/// Returns messages filtered by kind.
async fn messages_by_kind(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<ChatPathParams>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesResponse>> {
    let mut conn = pg_client.get_connection().await?;

    conn.find_analysis(params.analysis_id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    let Some(chat) = conn
        .find_chat_by_analysis(params.analysis_id, claims.account_id)
        .await?
    else {
        return Ok(Json(MessagesResponse {
            success: true,
            messages: Vec::new(),
            total_messages: 0,
        }));
    };

    let all_messages = conn.list_messages(chat.id).await?;
    let total_messages = all_messages.len();

    let messages: Vec<MessageView> = match query.kind {
        Some(kind) => all_messages
            .into_iter()
            .filter(|message| message.kind == kind)
            .map(Into::into)
            .collect(),
        None => all_messages.into_iter().map(Into::into).collect(),
    };

    Ok(Json(MessagesResponse {
        success: true,
        messages,
        total_messages,
    }))
}

/// Generates a mind map on demand.
///
/// Regeneration is non-fatal: when the tutor does not return a mind map, or
/// fails outright, the analysis's stored mind map is returned instead.
#[tracing::instrument(skip_all, fields(analysis_id = %params.analysis_id))]
async fn generate_mind_map(
    State(pg_client): State<PgClient>,
    State(tutor_agent): State<Arc<TutorAgent>>,
    AuthState(claims): AuthState,
    Path(params): Path<ChatPathParams>,
    ValidateJson(request): ValidateJson<GenerateMindMapRequest>,
) -> Result<Json<MindMapGenerationResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let analysis = conn
        .find_analysis(params.analysis_id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    let material = material_of(&analysis);
    let prompt = request.custom_prompt.unwrap_or_else(|| {
        format!(
            "Create a detailed mind map for the following content: {}",
            analysis.extracted_text
        )
    });

    let mind_map = match tutor_agent
        .answer(&prompt, &material, &analysis.extracted_text)
        .await
    {
        Ok(reply) => reply.mind_map,
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "mind map generation failed, falling back to stored map"
            );
            None
        }
    };

    Ok(Json(MindMapGenerationResponse {
        success: true,
        mind_map_data: mind_map.unwrap_or_else(|| material.mind_map_or_default()),
        title: analysis.title,
    }))
}

/// Clears all messages of a chat.
async fn clear_history(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<ChatPathParams>,
) -> Result<Json<AckResponse>> {
    let mut conn = pg_client.get_connection().await?;

    conn.find_analysis(params.analysis_id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    if let Some(chat) = conn
        .find_chat_by_analysis(params.analysis_id, claims.account_id)
        .await?
    {
        conn.clear_messages(chat.id).await?;
    }

    Ok(Json(AckResponse::new("Chat history cleared successfully")))
}

/// Deletes the chat bound to an analysis.
async fn delete_chat(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<ChatPathParams>,
) -> Result<Json<AckResponse>> {
    let mut conn = pg_client.get_connection().await?;

    conn.find_analysis(params.analysis_id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    conn.delete_chat(params.analysis_id, claims.account_id)
        .await?;

    Ok(Json(AckResponse::new("Chat deleted successfully")))
}

/// Edits a user-authored message.
async fn update_message(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<MessagePathParams>,
    ValidateJson(request): ValidateJson<UpdateMessageRequest>,
) -> Result<Json<UpdateMessageResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let chat = conn
        .find_chat_by_id(params.chat_id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Chat not found"))?;

    let messages = conn.list_messages(chat.id).await?;
    let message = messages
        .iter()
        .find(|message| message.id == params.message_id)
        .ok_or_else(|| ErrorKind::NotFound.with_message("Message not found"))?;

    if !message.role.is_user() {
        return Err(ErrorKind::Forbidden.with_message("Can only edit user messages"));
    }

    let updated = conn
        .update_message_content(params.message_id, request.content)
        .await?;

    Ok(Json(UpdateMessageResponse {
        success: true,
        message: "Message updated successfully".to_string(),
        updated_message: updated.into(),
    }))
}

/// Deletes a message, applying paired deletion.
///
/// A user message immediately followed by its assistant reply removes both;
/// any other message removes only itself.
async fn delete_message(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<MessagePathParams>,
) -> Result<Json<AckResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let chat = conn
        .find_chat_by_id(params.chat_id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Chat not found"))?;

    let deleted = conn
        .delete_message_with_reply(chat.id, params.message_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Message not found"))?;

    tracing::debug!(
        target: TRACING_TARGET,
        chat_id = %chat.id,
        deleted,
        "message deleted"
    );

    Ok(Json(AckResponse::new("Message deleted successfully")))
}

/// Per-account chat statistics with recent conversations.
async fn chat_statistics(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
) -> Result<Json<ChatStatisticsResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let stats = conn.chat_statistics(claims.account_id).await?;
    let recent = conn.recent_chats(claims.account_id, RECENT_CHAT_LIMIT).await?;

    let mut recent_chats = Vec::with_capacity(recent.len());
    for chat in recent {
        let Some(analysis) = conn
            .find_analysis(chat.analysis_id, claims.account_id)
            .await?
        else {
            continue;
        };

        let messages = conn.list_messages(chat.id).await?;
        let last_message = messages.last().map(|message| {
            let mut preview: String = message.content.chars().take(PREVIEW_LEN).collect();
            if message.content.chars().count() > PREVIEW_LEN {
                preview.push_str("...");
            }
            preview
        });

        recent_chats.push(RecentChatEntry {
            analysis_id: chat.analysis_id,
            analysis_title: analysis.title,
            content_type: analysis.content_type,
            message_count: messages.len(),
            last_message,
            updated_at: chat.updated_at.into(),
        });
    }

    Ok(Json(ChatStatisticsResponse {
        success: true,
        statistics: ChatStatisticsBody {
            total_chats: stats.total_chats,
            total_messages: stats.total_messages,
            avg_messages_per_chat: stats.average_messages(),
        },
        recent_chats,
    }))
}

/// Returns a [`Router`] with all related routes.
///
/// Specific routes are registered before parameterized ones.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/chat/statistics", get(chat_statistics))
        .route("/chat/message", post(send_message))
        .route(
            "/chat/history/{analysisId}",
            get(chat_history).delete(clear_history),
        )
        .route("/chat/history/{analysisId}/messages", get(messages_by_kind))
        .route("/chat/mindmap/{analysisId}", post(generate_mind_map))
        .route("/chat/{analysisId}", delete(delete_chat))
        .route(
            "/chat/{chatId}/message/{messageId}",
            put(update_message).delete(delete_message),
        )
}
