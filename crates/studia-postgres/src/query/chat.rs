//! Chat repository for conversation threads and their messages.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::error::PgResult;
use crate::model::{Chat, ChatMessage, NewChat, NewChatMessage, paired_deletion_ids};
use crate::types::MessageKind;
use crate::{PgConnection, schema};

/// Per-account chat statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatStatistics {
    /// Total number of chats.
    pub total_chats: i64,
    /// Total number of messages across all chats.
    pub total_messages: i64,
}

impl ChatStatistics {
    /// Average number of messages per chat.
    pub fn average_messages(&self) -> f64 {
        if self.total_chats == 0 {
            0.0
        } else {
            self.total_messages as f64 / self.total_chats as f64
        }
    }
}

/// Repository for chat database operations.
pub trait ChatRepository {
    /// Finds the chat bound to an analysis, scoped to its owner.
    fn find_chat_by_analysis(
        &mut self,
        analysis_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Chat>>> + Send;

    /// Finds a chat by id, scoped to its owner.
    fn find_chat_by_id(
        &mut self,
        chat_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Chat>>> + Send;

    /// Finds the chat for an analysis, creating it on first use.
    fn find_or_create_chat(
        &mut self,
        analysis_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Chat>> + Send;

    /// Appends a message to a chat.
    fn append_message(
        &mut self,
        message: NewChatMessage,
    ) -> impl Future<Output = PgResult<ChatMessage>> + Send;

    /// Lists a chat's messages in conversation order.
    fn list_messages(
        &mut self,
        chat_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<ChatMessage>>> + Send;

    /// Lists a chat's messages of one kind, in conversation order.
    fn list_messages_by_kind(
        &mut self,
        chat_id: Uuid,
        kind: MessageKind,
    ) -> impl Future<Output = PgResult<Vec<ChatMessage>>> + Send;

    /// Updates the text content of a message.
    fn update_message_content(
        &mut self,
        message_id: Uuid,
        content: String,
    ) -> impl Future<Output = PgResult<ChatMessage>> + Send;

    /// Deletes a message; a user message deletes its immediately following
    /// assistant reply with it. Returns the number of deleted messages, or
    /// `None` when the message does not belong to the chat.
    fn delete_message_with_reply(
        &mut self,
        chat_id: Uuid,
        message_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<usize>>> + Send;

    /// Removes all messages from a chat.
    fn clear_messages(&mut self, chat_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;

    /// Deletes a chat and its messages, scoped to its owner.
    fn delete_chat(
        &mut self,
        analysis_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Computes per-account chat statistics.
    fn chat_statistics(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<ChatStatistics>> + Send;

    /// Lists the account's most recently updated chats.
    fn recent_chats(
        &mut self,
        account_id: Uuid,
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<Chat>>> + Send;
}

impl ChatRepository for PgConnection {
    async fn find_chat_by_analysis(
        &mut self,
        target_analysis: Uuid,
        owner_id: Uuid,
    ) -> PgResult<Option<Chat>> {
        use schema::chats::dsl::*;

        let chat = chats
            .filter(analysis_id.eq(target_analysis))
            .filter(account_id.eq(owner_id))
            .select(Chat::as_select())
            .first(self)
            .await
            .optional()?;

        Ok(chat)
    }

    async fn find_chat_by_id(&mut self, target_chat: Uuid, owner_id: Uuid) -> PgResult<Option<Chat>> {
        use schema::chats::dsl::*;

        let chat = chats
            .filter(id.eq(target_chat))
            .filter(account_id.eq(owner_id))
            .select(Chat::as_select())
            .first(self)
            .await
            .optional()?;

        Ok(chat)
    }

    async fn find_or_create_chat(
        &mut self,
        target_analysis: Uuid,
        owner_id: Uuid,
    ) -> PgResult<Chat> {
        if let Some(chat) = self.find_chat_by_analysis(target_analysis, owner_id).await? {
            return Ok(chat);
        }

        use schema::chats;

        let chat = diesel::insert_into(chats::table)
            .values(&NewChat {
                id: Uuid::now_v7(),
                analysis_id: target_analysis,
                account_id: owner_id,
            })
            .returning(Chat::as_returning())
            .get_result(self)
            .await?;

        Ok(chat)
    }

    async fn append_message(&mut self, message: NewChatMessage) -> PgResult<ChatMessage> {
        use schema::chat_messages;

        let message = diesel::insert_into(chat_messages::table)
            .values(&message)
            .returning(ChatMessage::as_returning())
            .get_result(self)
            .await?;

        Ok(message)
    }

    async fn list_messages(&mut self, target_chat: Uuid) -> PgResult<Vec<ChatMessage>> {
        use schema::chat_messages::dsl::*;

        let messages = chat_messages
            .filter(chat_id.eq(target_chat))
            .order((created_at.asc(), id.asc()))
            .select(ChatMessage::as_select())
            .load(self)
            .await?;

        Ok(messages)
    }

    async fn list_messages_by_kind(
        &mut self,
        target_chat: Uuid,
        message_kind: MessageKind,
    ) -> PgResult<Vec<ChatMessage>> {
        use schema::chat_messages::dsl::*;

        let messages = chat_messages
            .filter(chat_id.eq(target_chat))
            .filter(kind.eq(message_kind))
            .order((created_at.asc(), id.asc()))
            .select(ChatMessage::as_select())
            .load(self)
            .await?;

        Ok(messages)
    }

    async fn update_message_content(
        &mut self,
        message_id: Uuid,
        new_content: String,
    ) -> PgResult<ChatMessage> {
        use schema::chat_messages::dsl::*;

        let message = diesel::update(chat_messages.filter(id.eq(message_id)))
            .set(content.eq(new_content))
            .returning(ChatMessage::as_returning())
            .get_result(self)
            .await?;

        Ok(message)
    }

    async fn delete_message_with_reply(
        &mut self,
        target_chat: Uuid,
        message_id: Uuid,
    ) -> PgResult<Option<usize>> {
        use schema::chat_messages::dsl::*;

        let messages = self.list_messages(target_chat).await?;
        let Some(ids) = paired_deletion_ids(&messages, message_id) else {
            return Ok(None);
        };

        let deleted = diesel::delete(chat_messages.filter(id.eq_any(&ids)))
            .execute(self)
            .await?;

        Ok(Some(deleted))
    }

    async fn clear_messages(&mut self, target_chat: Uuid) -> PgResult<()> {
        use schema::chat_messages::dsl::*;

        diesel::delete(chat_messages.filter(chat_id.eq(target_chat)))
            .execute(self)
            .await?;

        Ok(())
    }

    async fn delete_chat(&mut self, target_analysis: Uuid, owner_id: Uuid) -> PgResult<bool> {
        use schema::chats::dsl::*;

        let deleted = diesel::delete(
            chats
                .filter(analysis_id.eq(target_analysis))
                .filter(account_id.eq(owner_id)),
        )
        .execute(self)
        .await?;

        Ok(deleted > 0)
    }

    async fn chat_statistics(&mut self, owner_id: Uuid) -> PgResult<ChatStatistics> {
        use schema::{chat_messages, chats};

        let total_chats: i64 = chats::table
            .filter(chats::account_id.eq(owner_id))
            .count()
            .get_result(self)
            .await?;

        let total_messages: i64 = chat_messages::table
            .inner_join(chats::table)
            .filter(chats::account_id.eq(owner_id))
            .count()
            .get_result(self)
            .await?;

        Ok(ChatStatistics {
            total_chats,
            total_messages,
        })
    }

    async fn recent_chats(&mut self, owner_id: Uuid, limit: i64) -> PgResult<Vec<Chat>> {
        use schema::chats::dsl::*;

        let items = chats
            .filter(account_id.eq(owner_id))
            .order(updated_at.desc())
            .limit(limit)
            .select(Chat::as_select())
            .load(self)
            .await?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_messages_handles_empty() {
        let stats = ChatStatistics::default();
        assert_eq!(stats.average_messages(), 0.0);
    }

    #[test]
    fn average_messages_divides() {
        let stats = ChatStatistics {
            total_chats: 4,
            total_messages: 10,
        };
        assert_eq!(stats.average_messages(), 2.5);
    }
}
