use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::ports::{
    ChatBackendError, ChatBackendFactory, PromptMessage, TranscriptionEngine, TranscriptionError,
};
use crate::domain::BackendChoice;

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert call analyst. Analyze the call transcript below and respond with a single JSON object, no markdown, no commentary, with exactly these fields:
{
  \"summary\": string, a concise summary of the call,
  \"duration_minutes\": integer, estimated call duration in minutes,
  \"participant_count\": integer, number of distinct speakers,
  \"key_aspects\": array of short strings, the main points discussed,
  \"sentiment\": string, one of \"positive\", \"neutral\" or \"negative\"
}

Transcript:
";

/// The structured analysis produced for one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSummary {
    pub summary: String,
    pub duration_minutes: i64,
    pub participant_count: i64,
    pub key_aspects: Vec<String>,
    pub sentiment: String,
    pub transcript: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("generation failed: {0}")]
    Generation(#[from] ChatBackendError),
    #[error("malformed summary payload: {0}")]
    MalformedSummary(#[from] serde_json::Error),
}

/// Turns a raw recording into a transcript plus a structured summary.
///
/// Transcription goes through the port; the summary comes from the primary
/// backend instructed to emit strict JSON. Neither call is retried.
pub struct SummaryService {
    transcription: Arc<dyn TranscriptionEngine>,
    backend_factory: Arc<dyn ChatBackendFactory>,
}

impl SummaryService {
    pub fn new(
        transcription: Arc<dyn TranscriptionEngine>,
        backend_factory: Arc<dyn ChatBackendFactory>,
    ) -> Self {
        Self {
            transcription,
            backend_factory,
        }
    }

    pub async fn transcribe(&self, audio: &[u8]) -> Result<String, SummaryError> {
        Ok(self.transcription.transcribe(audio).await?)
    }

    #[tracing::instrument(skip(self, audio), fields(audio_bytes = audio.len()))]
    pub async fn summarize(&self, audio: &[u8]) -> Result<CallSummary, SummaryError> {
        let transcript = self.transcription.transcribe(audio).await?;
        tracing::debug!(chars = transcript.len(), "transcription complete");

        let backend = self.backend_factory.create(BackendChoice::default());
        let prompt = format!("{}{}", SUMMARY_SYSTEM_PROMPT, transcript);
        let raw = backend.generate(&[PromptMessage::user(prompt)]).await?;

        let parsed: SummaryFields = serde_json::from_str(strip_code_fences(&raw))?;
        tracing::info!(sentiment = %parsed.sentiment, "summary generation complete");

        Ok(CallSummary {
            summary: parsed.summary,
            duration_minutes: parsed.duration_minutes,
            participant_count: parsed.participant_count,
            key_aspects: parsed.key_aspects,
            sentiment: parsed.sentiment,
            transcript,
        })
    }
}

#[derive(Deserialize)]
struct SummaryFields {
    summary: String,
    duration_minutes: i64,
    participant_count: i64,
    #[serde(default)]
    key_aspects: Vec<String>,
    sentiment: String,
}

// Models routinely wrap JSON in a fenced block despite instructions.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}
