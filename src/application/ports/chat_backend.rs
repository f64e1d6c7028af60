use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::BackendChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// One message of the sequence sent to a generation backend.
#[derive(Debug, Clone)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

/// A configured generation backend. Model id and temperature are bound at
/// construction; `generate` performs exactly one upstream call.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, ChatBackendError>;
}

/// Maps a [`BackendChoice`] to a freshly constructed backend client.
/// Credentials are validated at startup, so construction itself cannot fail.
pub trait ChatBackendFactory: Send + Sync {
    fn create(&self, choice: BackendChoice) -> Arc<dyn ChatBackend>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChatBackendError {
    #[error("backend request failed: {0}")]
    ApiRequestFailed(String),
    #[error("backend rate limited")]
    RateLimited,
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}
