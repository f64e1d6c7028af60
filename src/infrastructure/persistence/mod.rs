mod qdrant_index;
mod rest_record_store;

pub use qdrant_index::QdrantIndex;
pub use rest_record_store::RestRecordStore;
