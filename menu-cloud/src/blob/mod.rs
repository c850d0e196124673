//! Blob store for uploaded images
//!
//! `put` stores bytes under a relative path; `public_url` turns the returned
//! handle into the URL the public menu page embeds.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("invalid blob path: {0}")]
    InvalidPath(String),

    #[error("blob backend error: {0}")]
    Backend(String),
}

/// Reference to a stored blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHandle {
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobHandle, BlobError>;

    async fn get(&self, path: &str) -> Result<Option<StoredBlob>, BlobError>;

    fn public_url(&self, handle: &BlobHandle) -> String;
}

/// Reject absolute paths and parent-directory segments
pub fn validate_path(path: &str) -> Result<(), BlobError> {
    let bad = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg.is_empty() || seg == "..");
    if bad {
        return Err(BlobError::InvalidPath(path.to_string()));
    }
    Ok(())
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("logos/r1/abc.jpg").is_ok());
        assert!(validate_path("").is_err());
        assert!(validate_path("/etc/passwd").is_err());
        assert!(validate_path("logos/../secrets").is_err());
        assert!(validate_path("logos//x.jpg").is_err());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:3000/blobs/", "a/b.jpg"),
            "http://localhost:3000/blobs/a/b.jpg"
        );
    }
}
