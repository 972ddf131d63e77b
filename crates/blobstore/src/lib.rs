mod error;
mod keys;
mod memory;
mod object_store;

#[cfg(feature = "s3")]
mod s3;

pub use error::BlobStoreError;
pub use keys::{replay_key, video_key};
pub use memory::InMemoryBlobStore;
pub use object_store::ObjectStore;

#[cfg(feature = "s3")]
pub use s3::S3BlobStore;
