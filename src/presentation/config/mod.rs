mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AuthSettings, BlobStoreSettings, ContextSettings, EmbeddingsSettings, LlmSettings,
    LoggingSettings, RecordStoreSettings, ServerSettings, Settings, TranscriptionSettings,
    VectorIndexSettings, VendorSettings,
};
