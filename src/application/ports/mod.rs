mod blob_store;
mod chat_backend;
mod embedder;
mod record_store;
mod transcription_engine;
mod vector_index;

pub use blob_store::{BlobStore, BlobStoreError};
pub use chat_backend::{
    ChatBackend, ChatBackendError, ChatBackendFactory, PromptMessage, PromptRole,
};
pub use embedder::{Embedder, EmbedderError};
pub use record_store::{RecordStore, RecordStoreError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
pub use vector_index::{ScoredDocument, VectorIndex, VectorIndexError};
