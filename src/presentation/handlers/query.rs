use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CallId, ConversationTurn};
use crate::infrastructure::observability::sanitize_question;
use crate::presentation::auth::AuthContext;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ChatQueryRequest {
    pub question: String,
    #[serde(default)]
    pub chat_history: Option<Vec<ConversationTurn>>,
    #[serde(default)]
    pub model_choice: Option<String>,
    #[serde(default)]
    pub selected_call_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct ChatQueryResponse {
    pub answer: String,
    pub sources: Vec<SourceDocumentBody>,
    pub model_used: String,
}

#[derive(Serialize)]
pub struct SourceDocumentBody {
    pub content: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[tracing::instrument(skip(state, auth, request), fields(user_id = %auth.user_id.as_uuid()))]
pub async fn query_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<ChatQueryRequest>,
) -> impl IntoResponse {
    if request.question.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "question must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    tracing::debug!(question = %sanitize_question(&request.question), "processing chat query");

    let history = request.chat_history.unwrap_or_default();
    let result = state
        .query_service
        .answer(
            auth.user_id,
            &request.question,
            &history,
            request.model_choice.as_deref(),
            request.selected_call_id.map(CallId::from_uuid),
        )
        .await;

    match result {
        Ok(result) => {
            tracing::info!(
                sources = result.sources.len(),
                model = %result.backend_used,
                "chat query processed"
            );
            (
                StatusCode::OK,
                Json(ChatQueryResponse {
                    answer: result.answer,
                    sources: result
                        .sources
                        .into_iter()
                        .map(|s| SourceDocumentBody {
                            content: s.content,
                            metadata: s.metadata,
                        })
                        .collect(),
                    model_used: result.backend_used.to_string(),
                }),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!(%error, "chat query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to process chatbot query: {}", error),
                }),
            )
                .into_response()
        }
    }
}
