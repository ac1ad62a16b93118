//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, which provides a unified
//! interface for uploading to different backends (local filesystem,
//! S3-compatible services, etc.).

mod local;
#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "s3")]
mod s3;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::{MockBackend, RecordedUpload};
#[cfg(feature = "s3")]
pub use self::s3::S3Backend;
use crate::error::Result;
use crate::models::{StoredObject, UploadRequest};
use async_trait::async_trait;

/// Unified interface for storage backends.
///
/// All storage operations are asynchronous to efficiently handle network
/// operations. A backend takes raw bytes and reports back where they ended
/// up; where exactly is the backend's business.
///
/// # Path Handling
/// Object keys are derived from the request's [`uri`](crate::UploadFile::uri)
/// and must be validated using [`validate_path`](crate::validate_path)
/// before use. Implementations should enforce this validation.
///
/// # Examples
///
/// ```
/// use stash_storage::{StorageBackend, UploadFile, UploadRequest, error::Result};
///
/// async fn upload_greeting(backend: &dyn StorageBackend) -> Result<String> {
///     let request = UploadRequest {
///         file: UploadFile {
///             name: "hello.txt",
///             mimetype: "text/plain",
///             data: b"Hello, World!",
///             uri: "greetings/hello.txt",
///         },
///         upload_path: "greetings",
///         parent_path_ids: &[],
///     };
///     let stored = backend.upload_file(request).await?;
///     Ok(stored.url)
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend (name taken from the configuration).
    /// Used for logging only.
    fn name(&self) -> &str;

    /// Upload a file.
    ///
    /// Creates a new object or overwrites an existing object at the key
    /// derived from the request uri, returning at minimum a retrievable url.
    ///
    /// # Notes
    /// - Whether [`key`](StoredObject::key), [`download_url`](StoredObject::download_url)
    ///   and [`integrity`](StoredObject::integrity) are populated depends on the
    ///   backend.
    /// - Returns [`InvalidPath`](crate::error::ErrorKind::InvalidPath) if the
    ///   uri escapes the storage root.
    async fn upload_file(&self, request: UploadRequest<'_>) -> Result<StoredObject>;
}
