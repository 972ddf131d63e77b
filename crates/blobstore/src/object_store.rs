use async_trait::async_trait;

use crate::error::BlobStoreError;

/// Content-addressed-by-key blob storage, written once and read many times.
/// No listing/delete API is exposed -- the Orchestrator only ever needs to
/// put an upload, fetch it back for decoding, and later put/fetch a
/// rendered video, matching spec.md §4's S3-shaped object model.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), BlobStoreError>;
    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobStoreError>;
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError>;
}
