use async_trait::async_trait;

/// Row-oriented access to the external record store.
///
/// Rows travel as raw JSON objects; callers deserialize into domain types
/// and decide how to handle rows that do not parse. An empty result set is
/// `Ok(vec![])`, never an error. Every call-record and conversation read
/// must carry the owner-id equality filter; that filter is the only thing
/// keeping tenants apart.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// `order` uses the `column` / `column.desc` convention.
    async fn fetch(
        &self,
        table: &str,
        filters: &[(&str, String)],
        order: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<serde_json::Value>, RecordStoreError>;

    /// Fetches every row whose `column` equals any of `values`. An empty
    /// `values` set yields `Ok(vec![])` without touching the store.
    async fn fetch_in(
        &self,
        table: &str,
        column: &str,
        values: &[String],
    ) -> Result<Vec<serde_json::Value>, RecordStoreError>;

    async fn insert(
        &self,
        table: &str,
        row: serde_json::Value,
    ) -> Result<serde_json::Value, RecordStoreError>;

    async fn update(
        &self,
        table: &str,
        filters: &[(&str, String)],
        patch: serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, RecordStoreError>;

    async fn delete(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<(), RecordStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error("record store request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid record store response: {0}")]
    InvalidResponse(String),
}
