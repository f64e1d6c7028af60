use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

/// One processed call recording, as stored in the `call_records` table.
///
/// Created when a recording is uploaded, enriched once transcription and
/// summarization finish, and only ever mutated through the summary-update
/// operation. All analysis fields are optional: a freshly uploaded call has
/// none of them yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: CallId,
    pub user_id: UserId,
    #[serde(default)]
    pub filename: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub storage_path: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub participant_count: Option<i64>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key_aspects")]
    pub key_aspects: Option<Vec<String>>,
}

impl CallRecord {
    /// A freshly uploaded call: nothing analyzed yet, storage path set
    /// once the blob location is known.
    pub fn new(user_id: UserId, filename: String, file_size: i64) -> Self {
        Self {
            id: CallId::new(),
            user_id,
            filename,
            created_at: Utc::now(),
            storage_path: None,
            file_size: Some(file_size),
            transcript: None,
            summary: None,
            duration_minutes: None,
            participant_count: None,
            sentiment: None,
            key_aspects: None,
        }
    }
}

// Key aspects have been stored both as a JSON array and as a JSON-encoded
// string by older writers; accept either shape.
fn deserialize_key_aspects<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(parse_key_aspects))
}

fn parse_key_aspects(value: serde_json::Value) -> Option<Vec<String>> {
    let aspects = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        serde_json::Value::String(s) => match serde_json::from_str::<Vec<String>>(&s) {
            Ok(items) => items,
            Err(_) if !s.trim().is_empty() => vec![s],
            Err(_) => Vec::new(),
        },
        _ => return None,
    };

    if aspects.is_empty() { None } else { Some(aspects) }
}
