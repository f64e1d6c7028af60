use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::{HistoryError, NewChatMessage};
use crate::domain::{CallId, ChatMessage, Conversation, ConversationId};
use crate::presentation::auth::AuthContext;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct SaveConversationRequest {
    pub title: String,
    pub messages: Vec<MessageBody>,
}

#[derive(Deserialize)]
pub struct MessageBody {
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub audio_file_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<SavedMessageBody>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct SavedMessageBody {
    pub id: Uuid,
    pub role: String,
    pub content: String,
    pub audio_file_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ConversationListItem {
    pub id: Uuid,
    pub title: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    50
}

fn conversation_response(conversation: Conversation, messages: Vec<ChatMessage>) -> ConversationResponse {
    ConversationResponse {
        id: conversation.id.as_uuid(),
        title: conversation.title,
        messages: messages
            .into_iter()
            .map(|m| SavedMessageBody {
                id: m.id.as_uuid(),
                role: m.role,
                content: m.content,
                audio_file_id: m.audio_file_id.map(|id| id.as_uuid()),
                created_at: m.created_at,
            })
            .collect(),
        created_at: conversation.created_at,
        updated_at: conversation.updated_at,
    }
}

fn history_error_response(error: HistoryError) -> axum::response::Response {
    let status = match error {
        HistoryError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!(%error, "chat history operation failed");
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state, auth, request), fields(user_id = %auth.user_id.as_uuid()))]
pub async fn save_conversation_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<SaveConversationRequest>,
) -> impl IntoResponse {
    let messages = request
        .messages
        .into_iter()
        .map(|m| NewChatMessage {
            role: m.role,
            content: m.content,
            audio_file_id: m.audio_file_id.map(CallId::from_uuid),
        })
        .collect();

    match state
        .chat_history
        .save(auth.user_id, &request.title, messages)
        .await
    {
        Ok((conversation, saved)) => {
            (StatusCode::OK, Json(conversation_response(conversation, saved))).into_response()
        }
        Err(error) => history_error_response(error),
    }
}

pub async fn history_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<HistoryParams>,
) -> impl IntoResponse {
    match state.chat_history.list(auth.user_id, params.limit).await {
        Ok(conversations) => {
            let items: Vec<ConversationListItem> = conversations
                .into_iter()
                .map(|(conversation, message_count)| ConversationListItem {
                    id: conversation.id.as_uuid(),
                    title: conversation.title,
                    message_count,
                    created_at: conversation.created_at,
                    updated_at: conversation.updated_at,
                })
                .collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(error) => history_error_response(error),
    }
}

pub async fn get_conversation_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(conversation_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .chat_history
        .get(auth.user_id, ConversationId::from_uuid(conversation_id))
        .await
    {
        Ok((conversation, messages)) => {
            (StatusCode::OK, Json(conversation_response(conversation, messages))).into_response()
        }
        Err(error) => history_error_response(error),
    }
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

pub async fn delete_conversation_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(conversation_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .chat_history
        .delete(auth.user_id, ConversationId::from_uuid(conversation_id))
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(DeletedResponse {
                message: "Conversation deleted".to_string(),
            }),
        )
            .into_response(),
        Err(error) => history_error_response(error),
    }
}
