//! Storage models.
//!
//! Requests borrow everything from the caller; the upload result is owned so
//! it can outlive the request.

/// A file payload handed to a storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadFile<'a> {
    /// Display name of the file (usually the path relative to the upload folder)
    pub name: &'a str,
    /// MIME type sent along with the object
    pub mimetype: &'a str,
    /// Raw file contents
    pub data: &'a [u8],
    /// Storage uri; backends derive the object key from this
    pub uri: &'a str,
}

/// Everything a backend needs to store one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadRequest<'a> {
    pub file: UploadFile<'a>,
    /// Target folder the file is uploaded into
    pub upload_path: &'a str,
    /// Backend-specific hierarchy hint (parent folder ids for backends that
    /// address folders by id rather than by path). Ignored by path-addressed
    /// backends.
    pub parent_path_ids: &'a [String],
}

/// Where an uploaded file ended up.
///
/// Only the [`url`](Self::url) is guaranteed; the other fields depend on what
/// the backend is able to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Backend-supplied object key
    pub key: Option<String>,
    /// Canonical, retrievable url
    pub url: String,
    /// Separate url for downloading (if the backend distinguishes them)
    pub download_url: Option<String>,
    /// Integrity token for the stored bytes
    pub integrity: Option<String>,
}
impl StoredObject {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            key: None,
            url: url.into(),
            download_url: None,
            integrity: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_download_url(mut self, download_url: impl Into<String>) -> Self {
        self.download_url = Some(download_url.into());
        self
    }

    pub fn with_integrity(mut self, integrity: impl Into<String>) -> Self {
        self.integrity = Some(integrity.into());
        self
    }
}

/// Integrity token for a blob of data, as reported by the bundled backends.
pub(crate) fn integrity(data: &[u8]) -> String {
    format!("blake3-{}", blake3::hash(data))
}
