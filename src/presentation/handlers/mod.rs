mod chat_history;
mod health;
mod models;
mod query;
mod storage;
mod summarize;

use serde::Serialize;

pub use chat_history::{
    delete_conversation_handler, get_conversation_handler, history_handler, save_conversation_handler,
};
pub use health::health_handler;
pub use models::models_handler;
pub use query::query_handler;
pub use storage::{
    delete_file_handler, get_file_handler, list_files_handler, update_summary_handler,
    upload_handler,
};
pub use summarize::{summarize_handler, transcript_handler};

/// The single error shape every handler returns.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
