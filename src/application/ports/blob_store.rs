use async_trait::async_trait;

/// Object storage for the raw call recordings.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the blob and returns its public URL.
    async fn upload(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, BlobStoreError>;

    /// Issues a time-limited download URL for an existing blob.
    async fn signed_url(&self, path: &str, expires_in_secs: u64) -> Result<String, BlobStoreError>;

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("blob store request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid blob store response: {0}")]
    InvalidResponse(String),
}
