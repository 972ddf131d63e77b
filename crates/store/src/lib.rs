mod error;
mod index_rows;
mod kv;
mod memory;
mod persister;

#[cfg(feature = "dynamodb")]
mod dynamo;

pub use error::StoreError;
pub use index_rows::build_index_rows;
pub use kv::{Item, KeyValueStore};
pub use memory::InMemoryStore;
pub use persister::{match_table, MatchOutcome, PersistResult, Persister};

#[cfg(feature = "dynamodb")]
pub use dynamo::DynamoStore;
