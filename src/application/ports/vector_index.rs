use async_trait::async_trait;

use crate::domain::Embedding;

/// One document returned by a similarity search, in rank order.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub content: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub score: f32,
}

/// The shared similarity index used by the retrieval fallback. Population
/// happens outside this service; the engine only searches.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, VectorIndexError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VectorIndexError {
    #[error("vector index connection failed: {0}")]
    ConnectionFailed(String),
    #[error("similarity search failed: {0}")]
    SearchFailed(String),
}
