use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

use kuching::application::ports::{
    BlobStore, BlobStoreError, ChatBackend, ChatBackendError, ChatBackendFactory, Embedder,
    EmbedderError, PromptMessage, RecordStore, RecordStoreError, ScoredDocument,
    TranscriptionEngine, TranscriptionError, VectorIndex, VectorIndexError,
};
use kuching::application::services::{
    CallLibraryService, ChatHistoryService, ContextLimits, QueryService, SummaryService,
};
use kuching::domain::Embedding;
use kuching::presentation::AppState;
use kuching::presentation::config::{
    AuthSettings, BlobStoreSettings, ContextSettings, EmbeddingsSettings, LlmSettings,
    LoggingSettings, RecordStoreSettings, ServerSettings, Settings, TranscriptionSettings,
    VectorIndexSettings, VendorSettings,
};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_TOP_K: usize = 5;

/// In-memory record store: rows per table, equality filters matched
/// against the stored JSON, `column.desc` ordering, optional limit.
/// Counts read calls so tests can pin how many round trips an operation
/// costs.
#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: Mutex<std::collections::HashMap<String, Vec<serde_json::Value>>>,
    reads: AtomicUsize,
}

impl InMemoryRecordStore {
    pub fn with_rows(table: &str, rows: Vec<serde_json::Value>) -> Self {
        let store = Self::default();
        store
            .tables
            .lock()
            .unwrap()
            .insert(table.to_string(), rows);
        store
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn matches(row: &serde_json::Value, filters: &[(&str, String)]) -> bool {
        filters.iter().all(|(column, value)| {
            match row.get(*column) {
                Some(serde_json::Value::String(s)) => s == value,
                Some(other) => other.to_string() == *value,
                None => false,
            }
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch(
        &self,
        table: &str,
        filters: &[(&str, String)],
        order: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<serde_json::Value>, RecordStoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<serde_json::Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| Self::matches(row, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order {
            let (column, descending) = match order.strip_suffix(".desc") {
                Some(column) => (column, true),
                None => (order, false),
            };
            rows.sort_by_key(|row| row.get(column).map(|v| v.to_string()));
            if descending {
                rows.reverse();
            }
        }

        if let Some(limit) = limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn fetch_in(
        &self,
        table: &str,
        column: &str,
        values: &[String],
    ) -> Result<Vec<serde_json::Value>, RecordStoreError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        self.reads.fetch_add(1, Ordering::Relaxed);
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| match row.get(column) {
                        Some(serde_json::Value::String(s)) => values.contains(s),
                        Some(other) => values.contains(&other.to_string()),
                        None => false,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(
        &self,
        table: &str,
        row: serde_json::Value,
    ) -> Result<serde_json::Value, RecordStoreError> {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[(&str, String)],
        patch: serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, RecordStoreError> {
        let mut tables = self.tables.lock().unwrap();
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| Self::matches(row, filters)) {
                if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
                    for (key, value) in fields {
                        target.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<(), RecordStoreError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !Self::matches(row, filters));
        }
        Ok(())
    }
}

/// Record store whose every call fails, for upstream-failure tests.
pub struct FailingRecordStore;

#[async_trait::async_trait]
impl RecordStore for FailingRecordStore {
    async fn fetch(
        &self,
        _table: &str,
        _filters: &[(&str, String)],
        _order: Option<&str>,
        _limit: Option<usize>,
    ) -> Result<Vec<serde_json::Value>, RecordStoreError> {
        Err(RecordStoreError::ApiRequestFailed("store down".to_string()))
    }

    async fn fetch_in(
        &self,
        _table: &str,
        _column: &str,
        _values: &[String],
    ) -> Result<Vec<serde_json::Value>, RecordStoreError> {
        Err(RecordStoreError::ApiRequestFailed("store down".to_string()))
    }

    async fn insert(
        &self,
        _table: &str,
        _row: serde_json::Value,
    ) -> Result<serde_json::Value, RecordStoreError> {
        Err(RecordStoreError::ApiRequestFailed("store down".to_string()))
    }

    async fn update(
        &self,
        _table: &str,
        _filters: &[(&str, String)],
        _patch: serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, RecordStoreError> {
        Err(RecordStoreError::ApiRequestFailed("store down".to_string()))
    }

    async fn delete(
        &self,
        _table: &str,
        _filters: &[(&str, String)],
    ) -> Result<(), RecordStoreError> {
        Err(RecordStoreError::ApiRequestFailed("store down".to_string()))
    }
}

pub struct MockEmbedder;

#[async_trait::async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedderError> {
        Ok(Embedding::new(vec![0.1; 768]))
    }
}

/// Returns `document_count` ranked documents, rank recorded in metadata.
pub struct MockVectorIndex {
    pub document_count: usize,
}

#[async_trait::async_trait]
impl VectorIndex for MockVectorIndex {
    async fn search(
        &self,
        _embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, VectorIndexError> {
        Ok((0..self.document_count.min(top_k))
            .map(|rank| {
                let mut metadata = serde_json::Map::new();
                metadata.insert("rank".to_string(), serde_json::Value::from(rank));
                ScoredDocument {
                    content: format!("document {}", rank),
                    metadata,
                    score: 1.0 - rank as f32 * 0.1,
                }
            })
            .collect())
    }
}

/// A backend that records every message sequence it is asked to generate
/// from and replies with a canned answer.
pub struct RecordingBackend {
    pub answer: String,
    pub calls: Mutex<Vec<Vec<PromptMessage>>>,
}

impl RecordingBackend {
    pub fn new(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn last_messages(&self) -> Vec<PromptMessage> {
        self.calls.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ChatBackend for RecordingBackend {
    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, ChatBackendError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        Ok(self.answer.clone())
    }
}

pub struct FailingBackend;

#[async_trait::async_trait]
impl ChatBackend for FailingBackend {
    async fn generate(&self, _messages: &[PromptMessage]) -> Result<String, ChatBackendError> {
        Err(ChatBackendError::ApiRequestFailed("backend down".to_string()))
    }
}

/// Hands out the same backend instance regardless of choice so tests can
/// inspect its recorded calls.
pub struct SharedBackendFactory {
    pub backend: Arc<dyn ChatBackend>,
}

impl ChatBackendFactory for SharedBackendFactory {
    fn create(&self, _choice: kuching::domain::BackendChoice) -> Arc<dyn ChatBackend> {
        Arc::clone(&self.backend)
    }
}

pub struct MockBlobStore;

#[async_trait::async_trait]
impl BlobStore for MockBlobStore {
    async fn upload(
        &self,
        path: &str,
        _data: &[u8],
        _content_type: &str,
    ) -> Result<String, BlobStoreError> {
        Ok(format!("http://blobs.test/public/{}", path))
    }

    async fn signed_url(&self, path: &str, _expires_in_secs: u64) -> Result<String, BlobStoreError> {
        Ok(format!("http://blobs.test/signed/{}", path))
    }

    async fn delete(&self, _path: &str) -> Result<(), BlobStoreError> {
        Ok(())
    }
}

pub struct MockTranscriptionEngine {
    pub transcript: String,
}

#[async_trait::async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
        Ok(self.transcript.clone())
    }
}

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        auth: AuthSettings {
            jwt_secret: TEST_JWT_SECRET.to_string(),
        },
        record_store: RecordStoreSettings {
            url: "http://records.test".to_string(),
            service_key: "service-key".to_string(),
        },
        blob_store: BlobStoreSettings {
            url: "http://blobs.test".to_string(),
            service_key: "service-key".to_string(),
            bucket: "audio-files".to_string(),
        },
        vector_index: VectorIndexSettings {
            url: "http://qdrant.test:6334".to_string(),
            collection_name: "call_documents".to_string(),
            top_k: TEST_TOP_K,
        },
        embeddings: EmbeddingsSettings {
            model: "text-embedding-004".to_string(),
            dimension: 768,
        },
        llm: LlmSettings {
            gemini: VendorSettings {
                api_key: "gemini-key".to_string(),
                model: "gemini-2.5-flash".to_string(),
                temperature: 0.7,
            },
            groq: VendorSettings {
                api_key: "groq-key".to_string(),
                model: "qwen/qwen3-32b".to_string(),
                temperature: 0.6,
            },
        },
        transcription: TranscriptionSettings {
            api_key: "whisper-key".to_string(),
            base_url: "http://whisper.test/v1".to_string(),
            model: "whisper-1".to_string(),
        },
        context: ContextSettings {
            selected_transcript_chars: 5000,
            other_transcript_chars: 1000,
            max_other_calls: 5,
        },
        logging: LoggingSettings { enable_json: false },
    }
}

pub struct TestApp {
    pub router: axum::Router,
    pub backend: Arc<RecordingBackend>,
}

pub fn build_test_app(call_rows: Vec<serde_json::Value>, document_count: usize) -> TestApp {
    let backend = RecordingBackend::new("Mock answer");
    let record_store: Arc<dyn RecordStore> =
        Arc::new(InMemoryRecordStore::with_rows("call_records", call_rows));
    build_app_with(record_store, backend, document_count)
}

pub fn build_app_with(
    record_store: Arc<dyn RecordStore>,
    backend: Arc<RecordingBackend>,
    document_count: usize,
) -> TestApp {
    let settings = test_settings();
    let factory: Arc<dyn ChatBackendFactory> = Arc::new(SharedBackendFactory {
        backend: backend.clone(),
    });

    let query_service = Arc::new(QueryService::new(
        Arc::clone(&record_store),
        Arc::new(MockEmbedder),
        Arc::new(MockVectorIndex { document_count }),
        Arc::clone(&factory),
        ContextLimits::default(),
        TEST_TOP_K,
    ));
    let summary_service = Arc::new(SummaryService::new(
        Arc::new(MockTranscriptionEngine {
            transcript: "hello from the call".to_string(),
        }),
        factory,
    ));
    let call_library = Arc::new(CallLibraryService::new(
        Arc::clone(&record_store),
        Arc::new(MockBlobStore),
    ));
    let chat_history = Arc::new(ChatHistoryService::new(record_store));

    let state = AppState {
        query_service,
        summary_service,
        call_library,
        chat_history,
        settings,
    };

    TestApp {
        router: kuching::presentation::create_router(state),
        backend,
    }
}

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: usize,
}

pub fn bearer_token(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn call_record_row(
    id: Uuid,
    user_id: Uuid,
    filename: &str,
    created_at: &str,
    transcript: Option<&str>,
    summary: Option<&str>,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "user_id": user_id,
        "filename": filename,
        "created_at": created_at,
        "transcript": transcript,
        "summary": summary,
    })
}
