use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::{LibraryError, SummaryPatch};
use crate::domain::{CallId, CallRecord};
use crate::presentation::auth::AuthContext;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub file_id: Uuid,
    pub filename: String,
    pub storage_url: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct FileDetailResponse {
    #[serde(flatten)]
    pub record: CallRecord,
    pub download_url: Option<String>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

fn library_error_response(error: LibraryError) -> axum::response::Response {
    let status = match error {
        LibraryError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!(%error, "storage operation failed");
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn bad_request(detail: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: detail.to_string(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state, auth, multipart), fields(user_id = %auth.user_id.as_uuid()))]
pub async fn upload_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return bad_request("missing audio_file field"),
        Err(error) => return bad_request(&format!("invalid multipart body: {}", error)),
    };

    let filename = field.file_name().unwrap_or("recording").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = match field.bytes().await {
        Ok(data) => data,
        Err(error) => return bad_request(&format!("failed to read upload: {}", error)),
    };

    match state
        .call_library
        .upload(auth.user_id, &filename, &content_type, &data)
        .await
    {
        Ok((record, storage_url)) => (
            StatusCode::OK,
            Json(UploadResponse {
                file_id: record.id.as_uuid(),
                filename: record.filename,
                storage_url,
                message: "File uploaded successfully".to_string(),
            }),
        )
            .into_response(),
        Err(error) => library_error_response(error),
    }
}

pub async fn list_files_handler(
    State(state): State<AppState>,
    auth: AuthContext,
) -> impl IntoResponse {
    match state.call_library.list(auth.user_id).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => library_error_response(error),
    }
}

pub async fn get_file_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(file_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .call_library
        .get(auth.user_id, CallId::from_uuid(file_id))
        .await
    {
        Ok((record, download_url)) => (
            StatusCode::OK,
            Json(FileDetailResponse {
                record,
                download_url,
            }),
        )
            .into_response(),
        Err(error) => library_error_response(error),
    }
}

pub async fn delete_file_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(file_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .call_library
        .delete(auth.user_id, CallId::from_uuid(file_id))
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(DeletedResponse {
                message: "File deleted".to_string(),
            }),
        )
            .into_response(),
        Err(error) => library_error_response(error),
    }
}

pub async fn update_summary_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(file_id): Path<Uuid>,
    Json(patch): Json<SummaryPatch>,
) -> impl IntoResponse {
    match state
        .call_library
        .update_summary(auth.user_id, CallId::from_uuid(file_id), &patch)
        .await
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => library_error_response(error),
    }
}
