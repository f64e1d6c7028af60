use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{BlobStore, BlobStoreError};

/// Hosted object storage adapter (Supabase storage wire format).
pub struct RestBlobStore {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

#[derive(Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl RestBlobStore {
    pub fn new(base_url: String, service_key: String, bucket: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    fn object_url(&self, prefix: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}{}/{}",
            self.base_url, prefix, self.bucket, path
        )
    }
}

#[async_trait]
impl BlobStore for RestBlobStore {
    async fn upload(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, BlobStoreError> {
        let response = self
            .client
            .post(self.object_url("", path))
            .bearer_auth(&self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| BlobStoreError::ApiRequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BlobStoreError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        tracing::info!(path = %path, bytes = data.len(), "blob uploaded");
        Ok(self.object_url("public/", path))
    }

    async fn signed_url(&self, path: &str, expires_in_secs: u64) -> Result<String, BlobStoreError> {
        let response = self
            .client
            .post(self.object_url("sign/", path))
            .bearer_auth(&self.service_key)
            .json(&SignRequest {
                expires_in: expires_in_secs,
            })
            .send()
            .await
            .map_err(|e| BlobStoreError::ApiRequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BlobStoreError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: SignResponse = response
            .json()
            .await
            .map_err(|e| BlobStoreError::InvalidResponse(e.to_string()))?;

        Ok(format!("{}/storage/v1{}", self.base_url, parsed.signed_url))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobStoreError> {
        let response = self
            .client
            .delete(self.object_url("", path))
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| BlobStoreError::ApiRequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BlobStoreError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        tracing::info!(path = %path, "blob deleted");
        Ok(())
    }
}
