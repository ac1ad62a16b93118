//! Local filesystem storage backend.
//!
//! This module provides a storage backend implementation for the local filesystem.
//! Objects are stored in a configured directory and written using `tokio::fs`
//! for async I/O. Urls are built from a configured base url, so the directory
//! can be served by anything that maps that url onto it.

use crate::error::{ErrorKind, Result};
use crate::models::{StoredObject, UploadRequest, integrity};
use crate::path::object_key;
use crate::StorageBackend;
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage backend.
///
/// Stores objects in a directory on the local filesystem. All object keys are
/// relative to the configured root directory.
///
/// # Examples
///
/// ```no_run
/// use stash_storage::backend::LocalBackend;
///
/// let backend = LocalBackend::new("local", "/var/lib/stash/objects", "https://static.example.com");
/// assert!(backend.is_ok());
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
    /// Root directory objects are written into
    root: PathBuf,
    /// Url the root directory is reachable at
    base_url: String,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// # Arguments
    /// * `name` - A name for this backend (used in logging)
    /// * `root` - Absolute path to the storage root directory
    /// * `base_url` - Url under which the root directory is served
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or exists and is not a
    /// directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>, base_url: impl Into<String>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            // Use non-async here; it'll only happen once on start-up and it's
            // not worth the hassle of making the constructor async.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self {
            name: name.into(),
            root,
            base_url: base_url.into(),
        })
    }

    /// Public url for an object key.
    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_file(&self, request: UploadRequest<'_>) -> Result<StoredObject> {
        let key = object_key(request.file.uri)?;
        let abs_path = self.root.join(&key);
        // Create parent directories if needed, to keep behaviour
        // consistent with S3-compatible storage.
        if let Some(parent) = abs_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| Self::map_io_error(e, parent))?;
        }
        fs::write(&abs_path, request.file.data).await.map_err(|e| Self::map_io_error(e, &abs_path))?;
        tracing::debug!(
            backend = %self.name,
            key = %key,
            mimetype = request.file.mimetype,
            size_bytes = request.file.data.len(),
            "Stored object on local filesystem"
        );
        Ok(StoredObject::new(self.url(&key)).with_integrity(integrity(request.file.data)).with_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UploadFile;

    fn request<'a>(uri: &'a str, data: &'a [u8]) -> UploadRequest<'a> {
        UploadRequest {
            file: UploadFile {
                name: uri,
                mimetype: "text/plain",
                data,
                uri,
            },
            upload_path: "",
            parent_path_ids: &[],
        }
    }

    #[test]
    fn test_new_requires_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalBackend::new("name", temp_dir.path(), "http://localhost").is_ok());
        assert!(LocalBackend::new("name", "relative/path", "http://localhost").is_err());
        assert!(LocalBackend::new("name", "./relative", "http://localhost").is_err());
    }

    #[test]
    fn test_new_creates_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("objects");
        LocalBackend::new("name", &root, "http://localhost").unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_new_rejects_file_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, b"").unwrap();
        assert!(LocalBackend::new("name", &file, "http://localhost").is_err());
    }

    #[tokio::test]
    async fn test_upload_writes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local", temp_dir.path(), "https://static.test/").unwrap();
        let stored = backend.upload_file(request("assets/folder1/example.txt", b"Hello, World!")).await.unwrap();
        assert_eq!(stored.url, "https://static.test/assets/folder1/example.txt");
        assert_eq!(stored.key.as_deref(), Some("assets/folder1/example.txt"));
        assert_eq!(stored.download_url, None);
        assert_eq!(stored.integrity, Some(integrity(b"Hello, World!")));
        let written = std::fs::read(temp_dir.path().join("assets/folder1/example.txt")).unwrap();
        assert_eq!(written, b"Hello, World!");
    }

    #[tokio::test]
    async fn test_upload_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local", temp_dir.path(), "https://static.test").unwrap();
        backend.upload_file(request("file.txt", b"first")).await.unwrap();
        backend.upload_file(request("file.txt", b"second")).await.unwrap();
        assert_eq!(std::fs::read(temp_dir.path().join("file.txt")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local", temp_dir.path(), "https://static.test").unwrap();
        let err = backend.upload_file(request("../escape.txt", b"bad")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }
}
