use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// A single logical row: PK/SK identify it, `value` is its JSON body. The
/// store treats the body opaquely -- callers (de)serialize their own
/// record types -- matching the teacher's own preference for explicit
/// normalized structs over reflective/dynamic attribute access.
#[derive(Clone, Debug)]
pub struct Item {
    pub pk: String,
    pub sk: String,
    pub value: Value,
}

/// Minimal compare-and-set key-value store abstraction. One real backend
/// (DynamoDB, behind the `dynamodb` feature) and one in-memory fake used by
/// every test and by local/dev server runs. No locking or leasing API is
/// exposed -- per spec.md §9, an item's existence (or its current value,
/// for the optimistic-concurrency path) is the only synchronization
/// primitive.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, table: &str, pk: &str, sk: &str) -> Result<Option<Item>, StoreError>;

    /// Puts the item only if no row exists yet at (pk, sk). Returns `true`
    /// if this call created it, `false` if a row was already there (in
    /// which case nothing was written).
    async fn put_if_not_exists(&self, table: &str, item: Item) -> Result<bool, StoreError>;

    /// Unconditional upsert -- used for UPLOAD rows, which are owned
    /// exclusively by their uploader and safe to overwrite on re-upload.
    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError>;

    /// Optimistic read-modify-write: reads the current value (or `None`),
    /// runs `merge`, writes back only if nothing else wrote to (pk, sk) in
    /// between, retrying on conflict. Used for the MATCH row's
    /// create-or-merge-uploaders protocol.
    async fn conditional_update(
        &self,
        table: &str,
        pk: &str,
        sk: &str,
        merge: &(dyn Fn(Option<Value>) -> Value + Send + Sync),
        max_attempts: u32,
    ) -> Result<Value, StoreError>;

    async fn list_by_pk(&self, table: &str, pk: &str) -> Result<Vec<Item>, StoreError>;
}
