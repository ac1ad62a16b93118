//! S3-compatible storage backend.
//!
//! This module provides a storage backend implementation for S3-compatible
//! services including AWS S3, Backblaze B2, Tigris (Fly.io), MinIO and
//! others.
//!
//! # Credentials
//!
//! Credentials are provided explicitly via configuration (`key_id` and
//! `key_secret`).

use crate::{
    StorageBackend,
    error::{ErrorKind, Result},
    models::{StoredObject, UploadRequest, integrity},
    path::object_key,
};
use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region, retry::RetryConfig},
    primitives::ByteStream,
};
use exn::ResultExt;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Generous default for concurrent S3 requests.
const DEFAULT_CONCURRENT_REQUESTS: usize = 100;

/// S3-compatible storage backend.
///
/// Stores objects in an S3 bucket, optionally under a key prefix. Object keys
/// are the request uri relative to the configured prefix (if any).
///
/// # Urls
///
/// In order of preference, reported urls are built from:
/// 1. the configured public url (a CDN in front of the bucket, say),
/// 2. the custom endpoint, path-style (`{endpoint}/{bucket}/{key}`),
/// 3. the AWS virtual-hosted style (`https://{bucket}.s3.{region}.amazonaws.com/{key}`).
///
/// # Examples
///
/// ```no_run
/// use stash_storage::backend::S3Backend;
///
/// let backend = S3Backend::new(
///     "my-storage",
///     "my-bucket",
///     Some("assets/".to_string()),
///     "us-west-004",
///     Some("https://s3.us-west-004.backblazeb2.com".to_string()),
///     None,
///     "access_key_id",
///     "secret_access_key",
/// );
/// assert!(backend.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct S3Backend {
    name: String,
    client: Client,
    bucket: String,
    prefix: Option<String>,
    region: String,
    endpoint: Option<String>,
    public_url: Option<String>,
    /// Rate limiter for concurrent S3 requests.
    rate_limiter: Arc<Semaphore>,
}

impl S3Backend {
    /// Create a new S3 storage backend.
    ///
    /// # Arguments
    /// * `name` - A name for this backend (used in logging)
    /// * `bucket` - S3 bucket name
    /// * `prefix` - Optional key prefix (acts as virtual directory)
    /// * `region` - AWS region or provider-specific region (e.g., "us-west-004" for Backblaze)
    /// * `endpoint` - Custom endpoint URL for S3-compatible services
    /// * `public_url` - Base url objects are publicly reachable at, if not the bucket itself
    /// * `key_id` - AWS/provider access key ID
    /// * `key_secret` - AWS/provider secret access key
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        bucket: impl Into<String>,
        prefix: Option<String>,
        region: impl Into<String>,
        endpoint: Option<String>,
        public_url: Option<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Result<Self> {
        let prefix = prefix.as_deref().map(object_key).transpose()?;
        let region = region.into();
        let credentials = Credentials::new(key_id, key_secret, None, None, "stash-config");
        let mut config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(region.clone()))
            // Configure retry policy with exponential backoff (1 initial + 3 retries)
            .retry_config(RetryConfig::standard().with_max_attempts(4))
            // Use path-style addressing for better compatibility with
            // S3-compatible services (Backblaze, MinIO, etc.)
            .force_path_style(true);
        // Set custom endpoint for non-AWS services
        if let Some(endpoint_url) = &endpoint {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }
        let client = Client::from_conf(config_builder.build());
        let rate_limiter = Arc::new(Semaphore::new(DEFAULT_CONCURRENT_REQUESTS));
        Ok(Self {
            name: name.into(),
            client,
            bucket: bucket.into(),
            prefix,
            region,
            endpoint,
            public_url,
            rate_limiter,
        })
    }

    /// Construct the full S3 key from a storage uri.
    fn full_key(&self, uri: &str) -> Result<String> {
        Ok(full_key(self.prefix.as_deref(), &object_key(uri)?))
    }

    /// Acquire a rate limiter permit before making an S3 API call.
    async fn acquire_permit(&self) -> OwnedSemaphorePermit {
        // unwrap is safe: semaphore is never closed
        self.rate_limiter.clone().acquire_owned().await.unwrap()
    }
}

fn full_key(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}/{}", prefix.trim_end_matches('/'), key),
        None => key.to_string(),
    }
}

fn object_url(public_url: Option<&str>, endpoint: Option<&str>, bucket: &str, region: &str, key: &str) -> String {
    match (public_url, endpoint) {
        (Some(public), _) => format!("{}/{}", public.trim_end_matches('/'), key),
        (None, Some(endpoint)) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        (None, None) => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
    }
}

#[async_trait]
impl StorageBackend for S3Backend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_file(&self, request: UploadRequest<'_>) -> Result<StoredObject> {
        let key = self.full_key(request.file.uri)?;
        if !request.parent_path_ids.is_empty() {
            tracing::debug!(backend = %self.name, key = %key, "S3 is path-addressed; ignoring parent path ids");
        }
        let _permit = self.acquire_permit().await;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(request.file.mimetype)
            .body(ByteStream::from(request.file.data.to_vec()))
            .send()
            .await
            .or_raise(|| ErrorKind::Network(format!("PutObject failed for s3://{}/{}", self.bucket, key)))?;
        tracing::debug!(
            backend = %self.name,
            bucket = %self.bucket,
            key = %key,
            size_bytes = request.file.data.len(),
            "Stored object in S3"
        );
        let url = object_url(
            self.public_url.as_deref(),
            self.endpoint.as_deref(),
            &self.bucket,
            &self.region,
            &key,
        );
        Ok(StoredObject::new(url).with_integrity(integrity(request.file.data)).with_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "assets/folder1/example.txt", "assets/folder1/example.txt")]
    #[case(Some("library"), "assets/example.txt", "library/assets/example.txt")]
    #[case(Some("library/"), "assets/example.txt", "library/assets/example.txt")]
    fn test_full_key(#[case] prefix: Option<&str>, #[case] key: &str, #[case] expected: &str) {
        assert_eq!(full_key(prefix, key), expected);
    }

    #[test]
    fn test_url_prefers_public_url() {
        let url = object_url(Some("https://cdn.test/"), Some("https://s3.test"), "bucket", "eu", "a/b.txt");
        assert_eq!(url, "https://cdn.test/a/b.txt");
    }

    #[test]
    fn test_url_from_endpoint_is_path_style() {
        let url = object_url(None, Some("https://s3.us-west-004.backblazeb2.com/"), "bucket", "us-west-004", "a.txt");
        assert_eq!(url, "https://s3.us-west-004.backblazeb2.com/bucket/a.txt");
    }

    #[test]
    fn test_url_for_aws() {
        let url = object_url(None, None, "bucket", "eu-west-1", "a.txt");
        assert_eq!(url, "https://bucket.s3.eu-west-1.amazonaws.com/a.txt");
    }

    #[test]
    fn test_new_rejects_escaping_prefix() {
        let backend = S3Backend::new("s3", "bucket", Some("../up".to_string()), "eu", None, None, "id", "secret");
        assert!(backend.is_err());
    }
}
