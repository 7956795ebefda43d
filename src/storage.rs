use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("upload of '{key}' failed: {reason}")]
    Upload { key: String, reason: String },
}

/// StorageService
///
/// Contract for the object store behind the admin upload endpoint. Handlers only see this
/// trait, so the S3 client and the in-memory mock are interchangeable.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the configured bucket when it is missing. Only called for `Env::Local`,
    /// where the bucket lives in a throwaway MinIO container.
    async fn ensure_bucket_exists(&self);

    /// Stores `bytes` under `key` and returns the public URL of the object.
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;
}

/// S3StorageClient
///
/// aws-sdk-s3 client for any S3-compatible endpoint (MinIO locally, a hosted bucket in
/// production). Path-style addressing is forced because MinIO does not serve
/// virtual-hosted buckets.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
    public_url: String,
}

impl S3StorageClient {
    pub fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        public_url: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            bucket_name: bucket.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    async fn ensure_bucket_exists(&self) {
        // CreateBucket fails harmlessly when the bucket is already there.
        if let Err(e) = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            tracing::debug!(bucket = %self.bucket_name, error = ?e, "create_bucket skipped");
        }
    }

    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let key = sanitize_key(key);
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.clone(),
                reason: e.to_string(),
            })?;

        tracing::info!(key = %key, size, content_type, "object stored");
        Ok(format!("{}/{}", self.public_url, key))
    }
}

/// sanitize_key
///
/// Drops empty, `.` and `..` segments so a user-supplied folder cannot escape the
/// upload prefix.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// MockStorageService
///
/// Network-free `StorageService` for tests. Returns deterministic URLs so assertions can
/// match on the key.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, every upload returns a simulated failure.
    pub should_fail: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn upload(
        &self,
        key: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let key = sanitize_key(key);
        if self.should_fail {
            return Err(StorageError::Upload {
                key,
                reason: "simulated failure".to_string(),
            });
        }
        Ok(format!("http://localhost:9000/mock-bucket/{}", key))
    }
}

/// StorageState
///
/// Shared handle to the storage backend held by the application state.
pub type StorageState = Arc<dyn StorageService>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key_strips_traversal() {
        assert_eq!(sanitize_key("uploads/../../etc/passwd"), "uploads/etc/passwd");
        assert_eq!(sanitize_key("/uploads//./news/a.png"), "uploads/news/a.png");
    }

    #[tokio::test]
    async fn test_mock_upload_returns_key_url() {
        let url = MockStorageService::new()
            .upload("uploads/news/a.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:9000/mock-bucket/uploads/news/a.png");

        let failing = MockStorageService::new_failing()
            .upload("uploads/a.png", "image/png", vec![])
            .await;
        assert!(failing.is_err());
    }
}
