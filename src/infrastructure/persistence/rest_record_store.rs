use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::application::ports::{RecordStore, RecordStoreError};

/// PostgREST-style adapter for the hosted record store.
///
/// Tables are addressed as `{base_url}/rest/v1/{table}`; equality filters
/// become `column=eq.value` query parameters and ordering uses the
/// `column.desc` convention the port defines.
pub struct RestRecordStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RestRecordStore {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    fn filter_params(filters: &[(&str, String)]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|(column, value)| ((*column).to_string(), format!("eq.{}", value)))
            .collect()
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RecordStoreError> {
    if response.status() == StatusCode::TOO_MANY_REQUESTS || !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(RecordStoreError::ApiRequestFailed(format!(
            "HTTP {}: {}",
            status, body
        )));
    }
    Ok(response)
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn fetch(
        &self,
        table: &str,
        filters: &[(&str, String)],
        order: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<serde_json::Value>, RecordStoreError> {
        let mut params = Self::filter_params(filters);
        params.push(("select".to_string(), "*".to_string()));
        if let Some(order) = order {
            params.push(("order".to_string(), order.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        let response = self
            .authed(self.client.get(self.table_url(table)).query(&params))
            .send()
            .await
            .map_err(|e| RecordStoreError::ApiRequestFailed(e.to_string()))?;

        let response = check_status(response).await?;

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| RecordStoreError::InvalidResponse(e.to_string()))?;

        tracing::debug!(table = %table, rows = rows.len(), "fetched records");
        Ok(rows)
    }

    async fn fetch_in(
        &self,
        table: &str,
        column: &str,
        values: &[String],
    ) -> Result<Vec<serde_json::Value>, RecordStoreError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            (column.to_string(), format!("in.({})", values.join(","))),
            ("select".to_string(), "*".to_string()),
        ];

        let response = self
            .authed(self.client.get(self.table_url(table)).query(&params))
            .send()
            .await
            .map_err(|e| RecordStoreError::ApiRequestFailed(e.to_string()))?;

        let response = check_status(response).await?;

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| RecordStoreError::InvalidResponse(e.to_string()))?;

        tracing::debug!(table = %table, column = %column, rows = rows.len(), "fetched records by set");
        Ok(rows)
    }

    async fn insert(
        &self,
        table: &str,
        row: serde_json::Value,
    ) -> Result<serde_json::Value, RecordStoreError> {
        let response = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(|e| RecordStoreError::ApiRequestFailed(e.to_string()))?;

        let response = check_status(response).await?;

        let mut rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| RecordStoreError::InvalidResponse(e.to_string()))?;

        if rows.is_empty() {
            return Err(RecordStoreError::InvalidResponse(
                "insert returned no rows".to_string(),
            ));
        }
        Ok(rows.remove(0))
    }

    async fn update(
        &self,
        table: &str,
        filters: &[(&str, String)],
        patch: serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, RecordStoreError> {
        let response = self
            .authed(
                self.client
                    .patch(self.table_url(table))
                    .query(&Self::filter_params(filters)),
            )
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await
            .map_err(|e| RecordStoreError::ApiRequestFailed(e.to_string()))?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| RecordStoreError::InvalidResponse(e.to_string()))
    }

    async fn delete(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<(), RecordStoreError> {
        let response = self
            .authed(
                self.client
                    .delete(self.table_url(table))
                    .query(&Self::filter_params(filters)),
            )
            .send()
            .await
            .map_err(|e| RecordStoreError::ApiRequestFailed(e.to_string()))?;

        check_status(response).await?;
        tracing::debug!(table = %table, "deleted records");
        Ok(())
    }
}
