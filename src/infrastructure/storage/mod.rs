mod rest_blob_store;

pub use rest_blob_store::RestBlobStore;
