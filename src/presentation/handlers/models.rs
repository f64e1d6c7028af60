use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::BackendChoice;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default: String,
}

#[derive(Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub model: String,
}

/// Lists the configured generation backends and which one is the default.
pub async fn models_handler(State(state): State<AppState>) -> impl IntoResponse {
    let models = vec![
        ModelInfo {
            id: BackendChoice::Gemini.to_string(),
            model: state.settings.llm.gemini.model.clone(),
        },
        ModelInfo {
            id: BackendChoice::Groq.to_string(),
            model: state.settings.llm.groq.model.clone(),
        },
    ];

    (
        StatusCode::OK,
        Json(ModelsResponse {
            models,
            default: BackendChoice::default().to_string(),
        }),
    )
}
