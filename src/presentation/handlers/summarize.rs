use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::CallSummary;
use crate::presentation::auth::AuthContext;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
}

async fn read_audio_field(multipart: &mut Multipart) -> Result<Vec<u8>, String> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| format!("invalid multipart body: {}", e))?
        .ok_or_else(|| "missing audio_file field".to_string())?;

    field
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| format!("failed to read upload: {}", e))
}

#[tracing::instrument(skip(state, auth, multipart), fields(user_id = %auth.user_id.as_uuid()))]
pub async fn summarize_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let audio = match read_audio_field(&mut multipart).await {
        Ok(audio) => audio,
        Err(detail) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: detail }))
                .into_response();
        }
    };

    match state.summary_service.summarize(&audio).await {
        Ok(summary) => (StatusCode::OK, Json::<CallSummary>(summary)).into_response(),
        Err(error) => {
            tracing::error!(%error, "summarization failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: error.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state, auth, multipart), fields(user_id = %auth.user_id.as_uuid()))]
pub async fn transcript_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let audio = match read_audio_field(&mut multipart).await {
        Ok(audio) => audio,
        Err(detail) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: detail }))
                .into_response();
        }
    };

    match state.summary_service.transcribe(&audio).await {
        Ok(transcript) => (StatusCode::OK, Json(TranscriptResponse { transcript })).into_response(),
        Err(error) => {
            tracing::error!(%error, "transcription failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: error.to_string(),
                }),
            )
                .into_response()
        }
    }
}
