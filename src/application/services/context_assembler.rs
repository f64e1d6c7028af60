use crate::domain::{CallId, CallRecord};

/// Character caps applied when call records are rendered into context.
///
/// These are exact contract values, not approximations: they bound prompt
/// size and therefore cost. Truncation is by character count, never
/// token-aware.
#[derive(Debug, Clone)]
pub struct ContextLimits {
    /// Transcript excerpt cap for the currently selected call.
    pub selected_transcript_chars: usize,
    /// Transcript excerpt cap for every other call.
    pub other_transcript_chars: usize,
    /// How many non-selected calls are rendered at most. Records arrive
    /// newest first, so this reads as "the N most recent other calls".
    pub max_other_calls: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            selected_transcript_chars: 5000,
            other_transcript_chars: 1000,
            max_other_calls: 5,
        }
    }
}

/// Renders a user's call records into one context blob for the direct
/// answer path.
///
/// An empty record set yields an empty string, which is the router's cue
/// to fall back to retrieval. When `selected_id` matches a record, that
/// call is rendered first under its own header with the enlarged
/// transcript cap; the remaining calls follow a separator header, capped
/// in number. Absent metadata fields are omitted entirely so the backend
/// never sees placeholder values. Headers and separator lines keep the
/// per-call blocks attributable.
pub fn assemble(records: &[CallRecord], selected_id: Option<CallId>, limits: &ContextLimits) -> String {
    if records.is_empty() {
        return String::new();
    }

    let selected = selected_id.and_then(|id| records.iter().find(|r| r.id == id));
    let others: Vec<&CallRecord> = records
        .iter()
        .filter(|r| Some(r.id) != selected.map(|s| s.id))
        .take(limits.max_other_calls)
        .collect();

    let mut parts: Vec<String> = Vec::new();

    if let Some(call) = selected {
        parts.push("=== CURRENTLY SELECTED CALL (User is viewing this call) ===\n".to_string());
        parts.push(format!("Filename: {}", call.filename));
        parts.push(format!("Created: {}", call.created_at));
        push_metadata(&mut parts, call);
        if let Some(transcript) = &call.transcript {
            parts.push(format!(
                "\nTranscript: {}",
                truncate_chars(transcript, limits.selected_transcript_chars)
            ));
        }
        parts.push(format!("\n{}\n", "=".repeat(60)));
    }

    if !others.is_empty() {
        parts.push("\n=== OTHER RECENT CALLS ===\n".to_string());
        for call in others {
            parts.push(format!("\n--- Call: {} ---", call.filename));
            parts.push(format!("Created: {}", call.created_at));
            push_metadata(&mut parts, call);
            if let Some(transcript) = &call.transcript {
                parts.push(format!(
                    "Transcript excerpt: {}...",
                    truncate_chars(transcript, limits.other_transcript_chars)
                ));
            }
        }
    }

    parts.join("\n")
}

fn push_metadata(parts: &mut Vec<String>, call: &CallRecord) {
    if let Some(summary) = &call.summary {
        parts.push(format!("Summary: {}", summary));
    }
    if let Some(duration) = call.duration_minutes {
        parts.push(format!("Duration: {} minutes", duration));
    }
    if let Some(participants) = call.participant_count {
        parts.push(format!("Participants: {}", participants));
    }
    if let Some(sentiment) = &call.sentiment {
        parts.push(format!("Sentiment: {}", sentiment));
    }
    if let Some(aspects) = &call.key_aspects {
        parts.push(format!("Key Points: {}", aspects.join(", ")));
    }
}

/// Character-count truncation that never splits a code point.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
