use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::ports::{
    BlobStore, BlobStoreError, RecordStore, RecordStoreError,
};
use crate::domain::{CallId, CallRecord, UserId};

const CALL_RECORDS_TABLE: &str = "call_records";
const SIGNED_URL_TTL_SECS: u64 = 300;

/// Partial update of a call's analysis fields. Absent fields are left
/// untouched in the stored row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_aspects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("record store: {0}")]
    RecordStore(#[from] RecordStoreError),
    #[error("blob store: {0}")]
    BlobStore(#[from] BlobStoreError),
    #[error("call not found")]
    NotFound,
    #[error("invalid stored row: {0}")]
    InvalidRow(#[from] serde_json::Error),
}

/// CRUD over a user's uploaded calls: blob storage plus the metadata row.
/// Every record operation carries the owner-id filter.
pub struct CallLibraryService {
    record_store: Arc<dyn RecordStore>,
    blob_store: Arc<dyn BlobStore>,
}

impl CallLibraryService {
    pub fn new(record_store: Arc<dyn RecordStore>, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            record_store,
            blob_store,
        }
    }

    #[tracing::instrument(skip(self, data), fields(user_id = %user_id.as_uuid(), filename = %filename))]
    pub async fn upload(
        &self,
        user_id: UserId,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<(CallRecord, String), LibraryError> {
        let mut record = CallRecord::new(user_id, filename.to_string(), data.len() as i64);
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let storage_path = format!("{}/{}{}", user_id.as_uuid(), record.id.as_uuid(), extension);
        record.storage_path = Some(storage_path.clone());

        let storage_url = self
            .blob_store
            .upload(&storage_path, data, content_type)
            .await?;

        self.record_store
            .insert(CALL_RECORDS_TABLE, serde_json::to_value(&record)?)
            .await?;

        tracing::info!(call_id = %record.id.as_uuid(), "call uploaded");
        Ok((record, storage_url))
    }

    pub async fn list(&self, user_id: UserId) -> Result<Vec<CallRecord>, LibraryError> {
        let rows = self
            .record_store
            .fetch(
                CALL_RECORDS_TABLE,
                &[("user_id", user_id.as_uuid().to_string())],
                Some("created_at.desc"),
                None,
            )
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<CallRecord>(row) {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::warn!(%error, "skipping malformed call record row");
                    None
                }
            })
            .collect())
    }

    /// Returns the record plus a short-lived download URL when the blob
    /// still exists.
    pub async fn get(
        &self,
        user_id: UserId,
        call_id: CallId,
    ) -> Result<(CallRecord, Option<String>), LibraryError> {
        let record = self.fetch_owned(user_id, call_id).await?;

        let download_url = match &record.storage_path {
            Some(path) => Some(self.blob_store.signed_url(path, SIGNED_URL_TTL_SECS).await?),
            None => None,
        };

        Ok((record, download_url))
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id.as_uuid(), call_id = %call_id.as_uuid()))]
    pub async fn delete(&self, user_id: UserId, call_id: CallId) -> Result<(), LibraryError> {
        let record = self.fetch_owned(user_id, call_id).await?;

        if let Some(path) = &record.storage_path {
            self.blob_store.delete(path).await?;
        }

        self.record_store
            .delete(CALL_RECORDS_TABLE, &owned_filters(user_id, call_id))
            .await?;

        tracing::info!("call deleted");
        Ok(())
    }

    pub async fn update_summary(
        &self,
        user_id: UserId,
        call_id: CallId,
        patch: &SummaryPatch,
    ) -> Result<CallRecord, LibraryError> {
        let updated = self
            .record_store
            .update(
                CALL_RECORDS_TABLE,
                &owned_filters(user_id, call_id),
                serde_json::to_value(patch)?,
            )
            .await?;

        updated
            .into_iter()
            .next()
            .ok_or(LibraryError::NotFound)
            .and_then(|row| Ok(serde_json::from_value(row)?))
    }

    async fn fetch_owned(
        &self,
        user_id: UserId,
        call_id: CallId,
    ) -> Result<CallRecord, LibraryError> {
        let rows = self
            .record_store
            .fetch(CALL_RECORDS_TABLE, &owned_filters(user_id, call_id), None, None)
            .await?;

        rows.into_iter()
            .next()
            .ok_or(LibraryError::NotFound)
            .and_then(|row| Ok(serde_json::from_value(row)?))
    }
}

fn owned_filters(user_id: UserId, call_id: CallId) -> [(&'static str, String); 2] {
    [
        ("id", call_id.as_uuid().to_string()),
        ("user_id", user_id.as_uuid().to_string()),
    ]
}
