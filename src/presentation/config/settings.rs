use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub record_store: RecordStoreSettings,
    pub blob_store: BlobStoreSettings,
    pub vector_index: VectorIndexSettings,
    pub embeddings: EmbeddingsSettings,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub context: ContextSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordStoreSettings {
    pub url: String,
    pub service_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlobStoreSettings {
    pub url: String,
    pub service_key: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorIndexSettings {
    pub url: String,
    pub collection_name: String,
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsSettings {
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub gemini: VendorSettings,
    pub groq: VendorSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorSettings {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Context assembly caps. These are contract values: they bound prompt
/// size and cost exactly.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextSettings {
    pub selected_transcript_chars: usize,
    pub other_transcript_chars: usize,
    pub max_other_calls: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub enable_json: bool,
}

impl Settings {
    /// Layered load: `appsettings.{environment}.toml` plus `APP__`-prefixed
    /// environment overrides, then a fail-fast credential check. A missing
    /// credential is a startup error, never a per-request one.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name(&format!(
                "appsettings.{}",
                environment.as_str()
            )))
            .add_source(EnvironmentSource::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("llm.gemini.api_key", &self.llm.gemini.api_key),
            ("llm.groq.api_key", &self.llm.groq.api_key),
            ("auth.jwt_secret", &self.auth.jwt_secret),
            ("record_store.service_key", &self.record_store.service_key),
            ("blob_store.service_key", &self.blob_store.service_key),
            ("transcription.api_key", &self.transcription.api_key),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!(
                    "required setting {} is empty",
                    name
                )));
            }
        }

        Ok(())
    }
}
