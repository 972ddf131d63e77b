use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conditional write lost the compare-and-set race after {attempts} attempts")]
    PersistConflict { attempts: u32 },
    #[error("serialization failure")]
    Serde(#[from] serde_json::Error),
    #[error("backend I/O failure: {0}")]
    Backend(String),
}
