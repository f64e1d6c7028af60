use std::sync::Arc;

use crate::application::ports::{ChatBackend, ChatBackendFactory};
use crate::domain::BackendChoice;
use crate::infrastructure::llm::{GeminiBackend, GroqBackend};

/// Credentials and sampling parameters for one hosted vendor.
#[derive(Debug, Clone)]
pub struct VendorConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

/// Constructs a fresh backend client per call. No connection reuse across
/// requests; the upstream network call dominates latency either way.
pub struct LlmBackendFactory {
    gemini: VendorConfig,
    groq: VendorConfig,
}

impl LlmBackendFactory {
    pub fn new(gemini: VendorConfig, groq: VendorConfig) -> Self {
        Self { gemini, groq }
    }
}

impl ChatBackendFactory for LlmBackendFactory {
    fn create(&self, choice: BackendChoice) -> Arc<dyn ChatBackend> {
        match choice {
            BackendChoice::Gemini => Arc::new(GeminiBackend::new(
                self.gemini.api_key.clone(),
                self.gemini.model.clone(),
                self.gemini.temperature,
            )),
            BackendChoice::Groq => Arc::new(GroqBackend::new(
                self.groq.api_key.clone(),
                self.groq.model.clone(),
                self.groq.temperature,
            )),
        }
    }
}
