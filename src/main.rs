use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use kuching::application::ports::{ChatBackendFactory, RecordStore};
use kuching::application::services::{
    CallLibraryService, ChatHistoryService, ContextLimits, QueryService, SummaryService,
};
use kuching::infrastructure::audio::WhisperApiEngine;
use kuching::infrastructure::llm::{GeminiEmbedder, LlmBackendFactory, VendorConfig};
use kuching::infrastructure::observability::{TracingConfig, init_tracing};
use kuching::infrastructure::persistence::{QdrantIndex, RestRecordStore};
use kuching::infrastructure::storage::RestBlobStore;
use kuching::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment)?;

    init_tracing(
        TracingConfig::new(environment.to_string(), settings.logging.enable_json),
        settings.server.port,
    );
    tracing::info!(
        embeddings_model = %settings.embeddings.model,
        embeddings_dimension = settings.embeddings.dimension,
        top_k = settings.vector_index.top_k,
        "configuration loaded"
    );

    let record_store = Arc::new(RestRecordStore::new(
        settings.record_store.url.clone(),
        settings.record_store.service_key.clone(),
    ));
    let blob_store = Arc::new(RestBlobStore::new(
        settings.blob_store.url.clone(),
        settings.blob_store.service_key.clone(),
        settings.blob_store.bucket.clone(),
    ));
    let vector_index = Arc::new(QdrantIndex::new(
        &settings.vector_index.url,
        settings.vector_index.collection_name.clone(),
    )?);
    let embedder = Arc::new(GeminiEmbedder::new(
        settings.llm.gemini.api_key.clone(),
        settings.embeddings.model.clone(),
    ));
    let transcription = Arc::new(WhisperApiEngine::new(
        settings.transcription.api_key.clone(),
        settings.transcription.base_url.clone(),
        settings.transcription.model.clone(),
    ));
    let backend_factory = Arc::new(LlmBackendFactory::new(
        VendorConfig {
            api_key: settings.llm.gemini.api_key.clone(),
            model: settings.llm.gemini.model.clone(),
            temperature: settings.llm.gemini.temperature,
        },
        VendorConfig {
            api_key: settings.llm.groq.api_key.clone(),
            model: settings.llm.groq.model.clone(),
            temperature: settings.llm.groq.temperature,
        },
    ));

    let limits = ContextLimits {
        selected_transcript_chars: settings.context.selected_transcript_chars,
        other_transcript_chars: settings.context.other_transcript_chars,
        max_other_calls: settings.context.max_other_calls,
    };

    let query_service = Arc::new(QueryService::new(
        Arc::clone(&record_store) as Arc<dyn RecordStore>,
        embedder,
        vector_index,
        Arc::clone(&backend_factory) as Arc<dyn ChatBackendFactory>,
        limits,
        settings.vector_index.top_k,
    ));
    let summary_service = Arc::new(SummaryService::new(transcription, backend_factory));
    let call_library = Arc::new(CallLibraryService::new(
        Arc::clone(&record_store) as Arc<dyn RecordStore>,
        blob_store,
    ));
    let chat_history = Arc::new(ChatHistoryService::new(record_store));

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);

    let state = AppState {
        query_service,
        summary_service,
        call_library,
        chat_history,
        settings,
    };

    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
