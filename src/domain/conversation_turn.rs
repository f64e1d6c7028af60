use serde::{Deserialize, Serialize};

/// One prior turn of the conversation the caller replays with a query.
///
/// The role is kept as the raw string the client sent; turns with a role
/// other than "user" or "assistant" are dropped during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}
