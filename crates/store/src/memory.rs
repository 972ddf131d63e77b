use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::kv::{Item, KeyValueStore};

type Key = (String, String, String);

#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<HashMap<Key, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(table: &str, pk: &str, sk: &str) -> Key {
        (table.to_string(), pk.to_string(), sk.to_string())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_item(&self, table: &str, pk: &str, sk: &str) -> Result<Option<Item>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(&Self::key(table, pk, sk))
            .cloned()
            .map(|value| Item { pk: pk.to_string(), sk: sk.to_string(), value }))
    }

    async fn put_if_not_exists(&self, table: &str, item: Item) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let key = Self::key(table, &item.pk, &item.sk);
        if rows.contains_key(&key) {
            return Ok(false);
        }
        rows.insert(key, item.value);
        Ok(true)
    }

    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        rows.insert(Self::key(table, &item.pk, &item.sk), item.value);
        Ok(())
    }

    async fn conditional_update(
        &self,
        table: &str,
        pk: &str,
        sk: &str,
        merge: &(dyn Fn(Option<Value>) -> Value + Send + Sync),
        max_attempts: u32,
    ) -> Result<Value, StoreError> {
        let key = Self::key(table, pk, sk);
        for _ in 0..max_attempts {
            let mut rows = self.rows.lock().unwrap();
            let current = rows.get(&key).cloned();
            let merged = merge(current);
            rows.insert(key.clone(), merged.clone());
            return Ok(merged);
        }
        Err(StoreError::PersistConflict { attempts: max_attempts })
    }

    async fn list_by_pk(&self, table: &str, pk: &str) -> Result<Vec<Item>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|((t, p, _), _)| t == table && p == pk)
            .map(|((_, pk, sk), value)| Item { pk: pk.clone(), sk: sk.clone(), value: value.clone() })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_if_not_exists_only_creates_once() {
        let store = InMemoryStore::new();
        let created = store.put_if_not_exists("t", Item { pk: "a".into(), sk: "MATCH".into(), value: json!(1) }).await.unwrap();
        assert!(created);
        let created_again = store.put_if_not_exists("t", Item { pk: "a".into(), sk: "MATCH".into(), value: json!(2) }).await.unwrap();
        assert!(!created_again);
        let item = store.get_item("t", "a", "MATCH").await.unwrap().unwrap();
        assert_eq!(item.value, json!(1));
    }

    #[tokio::test]
    async fn list_by_pk_only_returns_matching_table_and_pk() {
        let store = InMemoryStore::new();
        store.put("t", Item { pk: "a".into(), sk: "MATCH".into(), value: json!(1) }).await.unwrap();
        store.put("t", Item { pk: "a".into(), sk: "STATS".into(), value: json!(2) }).await.unwrap();
        store.put("t", Item { pk: "b".into(), sk: "MATCH".into(), value: json!(3) }).await.unwrap();
        let rows = store.list_by_pk("t", "a").await.unwrap();
        assert_eq!(rows.len(), 2);
    }
}
