use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CallId, ConversationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// One message inside a saved conversation, as stored in `chat_messages`.
///
/// The role is kept as the raw string the client supplied; it is only
/// interpreted when a conversation is replayed into a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub audio_file_id: Option<CallId>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(
        conversation_id: ConversationId,
        role: String,
        content: String,
        audio_file_id: Option<CallId>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            role,
            content,
            audio_file_id,
            created_at: Utc::now(),
        }
    }
}
