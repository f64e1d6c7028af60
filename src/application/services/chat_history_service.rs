use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::{RecordStore, RecordStoreError};
use crate::domain::{CallId, ChatMessage, Conversation, ConversationId, UserId};

const CONVERSATIONS_TABLE: &str = "chat_conversations";
const MESSAGES_TABLE: &str = "chat_messages";

/// One message of a conversation being saved.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub role: String,
    pub content: String,
    pub audio_file_id: Option<CallId>,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("record store: {0}")]
    RecordStore(#[from] RecordStoreError),
    #[error("conversation not found")]
    NotFound,
    #[error("invalid stored row: {0}")]
    InvalidRow(#[from] serde_json::Error),
}

/// Persisted chat history, owner-scoped on every read and write.
pub struct ChatHistoryService {
    record_store: Arc<dyn RecordStore>,
}

impl ChatHistoryService {
    pub fn new(record_store: Arc<dyn RecordStore>) -> Self {
        Self { record_store }
    }

    #[tracing::instrument(skip(self, messages), fields(user_id = %user_id.as_uuid(), title = %title))]
    pub async fn save(
        &self,
        user_id: UserId,
        title: &str,
        messages: Vec<NewChatMessage>,
    ) -> Result<(Conversation, Vec<ChatMessage>), HistoryError> {
        let conversation = Conversation::new(user_id, title.to_string());
        self.record_store
            .insert(CONVERSATIONS_TABLE, serde_json::to_value(&conversation)?)
            .await?;

        let mut saved = Vec::with_capacity(messages.len());
        for message in messages {
            let row = ChatMessage::new(
                conversation.id,
                message.role,
                message.content,
                message.audio_file_id,
            );
            self.record_store
                .insert(MESSAGES_TABLE, serde_json::to_value(&row)?)
                .await?;
            saved.push(row);
        }

        tracing::info!(conversation_id = %conversation.id.as_uuid(), messages = saved.len(), "conversation saved");
        Ok((conversation, saved))
    }

    /// Lists the user's most recently updated conversations with their
    /// message counts. Two store reads total, regardless of how many
    /// conversations come back: one for the conversations, one for all
    /// their messages at once.
    pub async fn list(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<(Conversation, usize)>, HistoryError> {
        let rows = self
            .record_store
            .fetch(
                CONVERSATIONS_TABLE,
                &[("user_id", user_id.as_uuid().to_string())],
                Some("updated_at.desc"),
                Some(limit),
            )
            .await?;

        let conversations: Vec<Conversation> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(conversation) => Some(conversation),
                Err(error) => {
                    tracing::warn!(%error, "skipping malformed conversation row");
                    None
                }
            })
            .collect();

        let ids: Vec<String> = conversations
            .iter()
            .map(|c| c.id.as_uuid().to_string())
            .collect();
        let message_rows = self
            .record_store
            .fetch_in(MESSAGES_TABLE, "conversation_id", &ids)
            .await?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in &message_rows {
            if let Some(id) = row.get("conversation_id").and_then(|v| v.as_str()) {
                *counts.entry(id.to_string()).or_default() += 1;
            }
        }

        Ok(conversations
            .into_iter()
            .map(|conversation| {
                let count = counts
                    .get(&conversation.id.as_uuid().to_string())
                    .copied()
                    .unwrap_or(0);
                (conversation, count)
            })
            .collect())
    }

    pub async fn get(
        &self,
        user_id: UserId,
        conversation_id: ConversationId,
    ) -> Result<(Conversation, Vec<ChatMessage>), HistoryError> {
        let conversation = self.fetch_owned(user_id, conversation_id).await?;
        let messages = self.fetch_messages(conversation_id).await?;
        Ok((conversation, messages))
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id.as_uuid(), conversation_id = %conversation_id.as_uuid()))]
    pub async fn delete(
        &self,
        user_id: UserId,
        conversation_id: ConversationId,
    ) -> Result<(), HistoryError> {
        // Ownership check before anything is removed.
        self.fetch_owned(user_id, conversation_id).await?;

        self.record_store
            .delete(
                MESSAGES_TABLE,
                &[("conversation_id", conversation_id.as_uuid().to_string())],
            )
            .await?;
        self.record_store
            .delete(
                CONVERSATIONS_TABLE,
                &[
                    ("id", conversation_id.as_uuid().to_string()),
                    ("user_id", user_id.as_uuid().to_string()),
                ],
            )
            .await?;

        tracing::info!("conversation deleted");
        Ok(())
    }

    async fn fetch_owned(
        &self,
        user_id: UserId,
        conversation_id: ConversationId,
    ) -> Result<Conversation, HistoryError> {
        let rows = self
            .record_store
            .fetch(
                CONVERSATIONS_TABLE,
                &[
                    ("id", conversation_id.as_uuid().to_string()),
                    ("user_id", user_id.as_uuid().to_string()),
                ],
                None,
                None,
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or(HistoryError::NotFound)
            .and_then(|row| Ok(serde_json::from_value(row)?))
    }

    async fn fetch_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<ChatMessage>, HistoryError> {
        let rows = self
            .record_store
            .fetch(
                MESSAGES_TABLE,
                &[("conversation_id", conversation_id.as_uuid().to_string())],
                Some("created_at"),
                None,
            )
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<ChatMessage>(row) {
                Ok(message) => Some(message),
                Err(error) => {
                    tracing::warn!(%error, "skipping malformed chat message row");
                    None
                }
            })
            .collect())
    }
}
