//! In-memory storage backend for testing.

use crate::error::{ErrorKind, Result};
use crate::models::{StoredObject, UploadRequest, integrity};
use crate::path::object_key;
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// An owned copy of one [`UploadRequest`] received by a [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub name: String,
    pub mimetype: String,
    pub data: Vec<u8>,
    pub uri: String,
    pub upload_path: String,
    pub parent_path_ids: Vec<String>,
}
impl From<&UploadRequest<'_>> for RecordedUpload {
    fn from(request: &UploadRequest<'_>) -> Self {
        Self {
            name: request.file.name.to_string(),
            mimetype: request.file.mimetype.to_string(),
            data: request.file.data.to_vec(),
            uri: request.file.uri.to_string(),
            upload_path: request.upload_path.to_string(),
            parent_path_ids: request.parent_path_ids.to_vec(),
        }
    }
}

/// In-memory storage backend for testing.
///
/// Every request is recorded (in order) behind a [`RwLock`], so all trait
/// methods can operate on `&self` without external synchronisation. Ideal
/// for unit tests that need a [`StorageBackend`] without filesystem or
/// network dependencies.
///
/// By default each upload reports a key of `asset-<n>` (`n` counting from
/// 1), a url of `https://cdn.test/<name>`, a download url with `?dl=1`
/// appended, and a BLAKE3 integrity token.
///
/// # Examples
///
/// ```
/// use stash_storage::backend::MockBackend;
/// use stash_storage::{StorageBackend, UploadFile, UploadRequest};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::default();
/// let file = UploadFile { name: "a.txt", mimetype: "text/plain", data: b"a", uri: "docs/a.txt" };
/// let request = UploadRequest { file, upload_path: "docs", parent_path_ids: &[] };
/// let stored = backend.upload_file(request).await.map_err(|e| format!("{e:?}"))?;
/// assert_eq!(stored.url, "https://cdn.test/a.txt");
/// assert_eq!(backend.uploads().await.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    base_url: String,
    with_keys: bool,
    failing: HashSet<String>,
    uploads: RwLock<Vec<RecordedUpload>>,
}

impl MockBackend {
    /// Change the name of the mock backend.
    ///
    /// # Example
    ///
    /// ```
    /// use stash_storage::backend::MockBackend;
    ///
    /// let backend = MockBackend::default().with_name("test");
    /// ```
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Change the base url reported urls are built from.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Stop reporting object keys (and download urls), like backends that
    /// only hand out a url.
    pub fn without_keys(mut self) -> Self {
        self.with_keys = false;
        self
    }

    /// Fail any upload whose uri equals `uri`. The failing request is still
    /// recorded.
    pub fn failing_on(mut self, uri: impl Into<String>) -> Self {
        self.failing.insert(uri.into());
        self
    }

    /// Snapshot of every request received so far, in order.
    pub async fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.read().await.clone()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            base_url: "https://cdn.test".to_string(),
            with_keys: true,
            failing: HashSet::new(),
            uploads: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_file(&self, request: UploadRequest<'_>) -> Result<StoredObject> {
        let count = {
            let mut guard = self.uploads.write().await;
            guard.push(RecordedUpload::from(&request));
            guard.len()
        };
        // Same key validation as the real backends, so path bugs surface in tests.
        object_key(request.file.uri)?;
        if self.failing.contains(request.file.uri) {
            exn::bail!(ErrorKind::Network(format!("mock failure for {}", request.file.uri)));
        }
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), request.file.name);
        let stored = StoredObject::new(&url).with_integrity(integrity(request.file.data));
        Ok(match self.with_keys {
            true => stored.with_key(format!("asset-{count}")).with_download_url(format!("{url}?dl=1")),
            false => stored,
        })
    }
}
