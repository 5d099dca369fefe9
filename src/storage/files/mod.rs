//! Object storage for uploaded sources and generated artifacts
//!
//! Backends store opaque blobs under generated references and hand out
//! time-limited download URLs.

mod local;
mod memory;
#[cfg(feature = "s3")]
mod s3;
mod signer;
mod storage;
mod types;

pub use local::LocalStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "s3")]
pub use s3::S3Storage;
pub use signer::UrlSigner;
pub use types::{FileMetadata, FileStorage, ObjectStorage};

#[cfg(test)]
pub use types::MockObjectStorage;
