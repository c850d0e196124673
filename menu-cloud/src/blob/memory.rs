//! In-memory blob store, served back through `GET /blobs/{*path}`

use async_trait::async_trait;
use dashmap::DashMap;

use super::{BlobError, BlobHandle, BlobStore, StoredBlob, join_url, validate_path};

#[derive(Debug)]
pub struct MemoryBlobStore {
    base_url: String,
    blobs: DashMap<String, StoredBlob>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            blobs: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobHandle, BlobError> {
        validate_path(path)?;
        self.blobs.insert(
            path.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(BlobHandle {
            path: path.to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<Option<StoredBlob>, BlobError> {
        validate_path(path)?;
        Ok(self.blobs.get(path).map(|b| b.clone()))
    }

    fn public_url(&self, handle: &BlobHandle) -> String {
        join_url(&self.base_url, &handle.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_and_url() {
        let store = MemoryBlobStore::new("http://localhost:3000/blobs");
        let handle = store
            .put("logos/r1/abc.jpg", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(
            store.public_url(&handle),
            "http://localhost:3000/blobs/logos/r1/abc.jpg"
        );

        let blob = store.get("logos/r1/abc.jpg").await.unwrap().unwrap();
        assert_eq!(blob.bytes, vec![1, 2, 3]);
        assert_eq!(blob.content_type, "image/jpeg");
        assert!(store.get("logos/r1/none.jpg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_rejects_traversal() {
        let store = MemoryBlobStore::new("http://x");
        let err = store.put("../x", vec![], "image/jpeg").await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidPath(_)));
        assert!(store.is_empty());
    }
}
