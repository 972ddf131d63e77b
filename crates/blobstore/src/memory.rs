use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::BlobStoreError;
use crate::object_store::ObjectStore;

#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for InMemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), BlobStoreError> {
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobStoreError> {
        self.objects.lock().unwrap().get(key).cloned().ok_or_else(|| BlobStoreError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_put_object() {
        let store = InMemoryBlobStore::new();
        store.put("replays/1/a.wowsreplay", vec![1, 2, 3]).await.unwrap();
        assert!(store.exists("replays/1/a.wowsreplay").await.unwrap());
        assert_eq!(store.get("replays/1/a.wowsreplay").await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn missing_key_is_a_typed_not_found() {
        let store = InMemoryBlobStore::new();
        let err = store.get("missing").await.unwrap_err();
        assert!(matches!(err, BlobStoreError::NotFound(_)));
    }
}
