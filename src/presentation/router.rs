use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    delete_conversation_handler, delete_file_handler, get_conversation_handler, get_file_handler,
    health_handler, history_handler, list_files_handler, models_handler, query_handler,
    save_conversation_handler, summarize_handler, transcript_handler, update_summary_handler,
    upload_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/models", get(models_handler))
        .route("/chat/query", post(query_handler))
        .route("/chat/save", post(save_conversation_handler))
        .route("/chat/history", get(history_handler))
        .route("/chat/{conversation_id}", get(get_conversation_handler))
        .route("/chat/{conversation_id}", delete(delete_conversation_handler))
        .route("/storage/upload", post(upload_handler))
        .route("/storage/files", get(list_files_handler))
        .route("/storage/file/{file_id}", get(get_file_handler))
        .route("/storage/file/{file_id}", delete(delete_file_handler))
        .route("/storage/file/{file_id}/summary", put(update_summary_handler))
        .route("/summarize", post(summarize_handler))
        .route("/transcript", post(transcript_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
