//! S3 blob store

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;

use super::{BlobError, BlobHandle, BlobStore, StoredBlob, join_url, validate_path};

#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    /// CDN or bucket URL the objects are publicly readable under
    public_base_url: String,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    /// Build a client from the default AWS credential chain
    pub async fn from_env(bucket: String, public_base_url: String) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(S3Client::new(&aws_config), bucket, public_base_url)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobHandle, BlobError> {
        validate_path(path)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(bytes.into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| BlobError::Backend(e.to_string()))?;
        Ok(BlobHandle {
            path: path.to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<Option<StoredBlob>, BlobError> {
        validate_path(path)?;
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                return Ok(None);
            }
            Err(err) => return Err(BlobError::Backend(err.to_string())),
        };

        let content_type = output
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| BlobError::Backend(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(Some(StoredBlob {
            bytes,
            content_type,
        }))
    }

    fn public_url(&self, handle: &BlobHandle) -> String {
        join_url(&self.public_base_url, &handle.path)
    }
}
