use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::SearchPointsBuilder;
use qdrant_client::qdrant::value::Kind;

use crate::application::ports::{ScoredDocument, VectorIndex, VectorIndexError};
use crate::domain::Embedding;

/// Qdrant-backed similarity index for the retrieval fallback.
///
/// Points carry their document text under the `text` payload key; all
/// other payload fields are passed through as source metadata.
pub struct QdrantIndex {
    client: Qdrant,
    collection_name: String,
}

impl QdrantIndex {
    pub fn new(url: &str, collection_name: String) -> Result<Self, VectorIndexError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorIndexError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            collection_name,
        })
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    #[tracing::instrument(skip(self, embedding), fields(collection = %self.collection_name))]
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, VectorIndexError> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection_name,
                    embedding.values.clone(),
                    top_k as u64,
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| VectorIndexError::SearchFailed(e.to_string()))?;

        let documents = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let mut metadata = serde_json::Map::new();
                let mut content = None;

                for (key, value) in point.payload {
                    let json = payload_value_to_json(value);
                    if key == "text" {
                        content = json.as_str().map(str::to_string);
                    } else {
                        metadata.insert(key, json);
                    }
                }

                Some(ScoredDocument {
                    content: content?,
                    metadata,
                    score: point.score,
                })
            })
            .collect();

        Ok(documents)
    }
}

fn payload_value_to_json(value: qdrant_client::qdrant::Value) -> serde_json::Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::from(i),
        Some(Kind::DoubleValue(d)) => serde_json::Value::from(d),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => serde_json::Value::Array(
            list.values.into_iter().map(payload_value_to_json).collect(),
        ),
        Some(Kind::StructValue(fields)) => serde_json::Value::Object(
            fields
                .fields
                .into_iter()
                .map(|(k, v)| (k, payload_value_to_json(v)))
                .collect(),
        ),
    }
}
