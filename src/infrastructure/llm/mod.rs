mod backend_factory;
mod gemini_backend;
mod gemini_embedder;
mod groq_backend;

pub use backend_factory::{LlmBackendFactory, VendorConfig};
pub use gemini_backend::GeminiBackend;
pub use gemini_embedder::GeminiEmbedder;
pub use groq_backend::GroqBackend;
