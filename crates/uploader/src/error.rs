//! Uploader Error Types
//!
//! Each variant names the collaborator call that failed; the collaborator's
//! own error is kept as the child in the `exn` error tree.

use derive_more::{Display, Error};

/// An uploader error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for uploader operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The catalog could not answer whether an asset path is recorded.
    #[display("could not check catalog for existing asset")]
    Lookup,
    /// The storage backend rejected or failed the upload.
    #[display("could not upload file to storage")]
    Storage,
    /// The file was stored, but recording it in the catalog failed.
    #[display("could not record uploaded asset in catalog")]
    Save,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// A failed save may be a lost race with another writer; re-running would
    /// then skip the file anyway.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Lookup | Self::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Storage.to_string(), "could not upload file to storage");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Lookup.is_retryable());
        assert!(ErrorKind::Storage.is_retryable());
        assert!(!ErrorKind::Save.is_retryable());
    }
}
