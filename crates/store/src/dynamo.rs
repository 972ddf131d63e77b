use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;
use crate::kv::{Item, KeyValueStore};

/// Production backend: one DynamoDB table per `matches-{gameType}` bucket
/// plus the three reverse-index tables, all sharing this client and the
/// `pk`/`sk`/`value` attribute layout (`value` holds the record as a JSON
/// string -- DynamoDB's own attribute model is not used for record fields,
/// matching the pack's other-examples convention of storing opaque JSON
/// blobs behind typed Rust structs rather than mapping every field).
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self { client: Client::new(&config) }
    }

    fn key(pk: &str, sk: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([("pk".to_string(), AttributeValue::S(pk.to_string())), ("sk".to_string(), AttributeValue::S(sk.to_string()))])
    }
}

fn decode_value(attrs: &HashMap<String, AttributeValue>) -> Result<Value, StoreError> {
    let raw = attrs
        .get("value")
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| StoreError::Backend("row missing `value` attribute".to_string()))?;
    Ok(serde_json::from_str(raw)?)
}

#[async_trait]
impl KeyValueStore for DynamoStore {
    async fn get_item(&self, table: &str, pk: &str, sk: &str) -> Result<Option<Item>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(Self::key(pk, sk)))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match output.item {
            Some(attrs) => Ok(Some(Item { pk: pk.to_string(), sk: sk.to_string(), value: decode_value(&attrs)? })),
            None => Ok(None),
        }
    }

    async fn put_if_not_exists(&self, table: &str, item: Item) -> Result<bool, StoreError> {
        let mut attrs = Self::key(&item.pk, &item.sk);
        attrs.insert("value".to_string(), AttributeValue::S(serde_json::to_string(&item.value)?));

        let result = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(attrs))
            .condition_expression("attribute_not_exists(pk)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(e)) if matches!(e.err(), PutItemError::ConditionalCheckFailedException(_)) => Ok(false),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
        let mut attrs = Self::key(&item.pk, &item.sk);
        attrs.insert("value".to_string(), AttributeValue::S(serde_json::to_string(&item.value)?));
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(attrs))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
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
        for attempt in 0..max_attempts {
            let current_item = self.get_item(table, pk, sk).await?;
            let current_raw = current_item.as_ref().map(|i| serde_json::to_string(&i.value)).transpose()?;
            let merged = merge(current_item.map(|i| i.value));
            let merged_raw = serde_json::to_string(&merged)?;

            let mut attrs = Self::key(pk, sk);
            attrs.insert("value".to_string(), AttributeValue::S(merged_raw));

            let mut request = self.client.put_item().table_name(table).set_item(Some(attrs));
            request = match &current_raw {
                Some(raw) => request.condition_expression("#v = :current").expression_attribute_names("#v", "value").expression_attribute_values(":current", AttributeValue::S(raw.clone())),
                None => request.condition_expression("attribute_not_exists(pk)"),
            };

            match request.send().await {
                Ok(_) => return Ok(merged),
                Err(SdkError::ServiceError(e)) if matches!(e.err(), PutItemError::ConditionalCheckFailedException(_)) => {
                    warn!(table, pk, sk, attempt, "conditional_update lost the race, retrying");
                    continue;
                }
                Err(e) => return Err(StoreError::Backend(e.to_string())),
            }
        }
        Err(StoreError::PersistConflict { attempts: max_attempts })
    }

    async fn list_by_pk(&self, table: &str, pk: &str) -> Result<Vec<Item>, StoreError> {
        let output = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression("pk = :pk")
            .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        output
            .items
            .unwrap_or_default()
            .iter()
            .map(|attrs| {
                let sk = attrs.get("sk").and_then(|v| v.as_s().ok()).unwrap_or_default().to_string();
                Ok(Item { pk: pk.to_string(), sk, value: decode_value(attrs)? })
            })
            .collect()
    }
}
