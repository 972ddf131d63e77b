use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("object not found at key `{0}`")]
    NotFound(String),
    #[error("backend I/O failure: {0}")]
    Backend(String),
}
