use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A file handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWithPath {
    pub name: String,
    /// Explicit MIME type; guessed from `name` when absent or empty
    pub mimetype: Option<String>,
    pub data: Vec<u8>,
    /// Path relative to the base folder; `name` is used when absent or empty
    pub relative_path: Option<String>,
}
impl FileWithPath {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mimetype: None,
            data: data.into(),
            relative_path: None,
        }
    }

    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    /// The path used to place this file: the relative path, else the name.
    pub(crate) fn path(&self) -> &str {
        self.relative_path.as_deref().filter(|p| !p.is_empty()).unwrap_or(&self.name)
    }
}

/// Everything needed to upload (and record) one file into a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadObject {
    /// Target folder; the asset path is `folder/relative_path`
    pub folder: String,
    pub relative_path: String,
    /// Backend hierarchy hint, forwarded to the storage backend
    pub parent_path_ids: Option<Vec<String>>,
    pub data: Vec<u8>,
    pub mimetype: String,
}

/// Running totals for one folder key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderStats {
    pub count: u64,
    /// Cumulative size in bytes
    pub size: u64,
}
impl FolderStats {
    pub(crate) fn record(&mut self, size: u64) {
        self.count += 1;
        self.size += size;
    }
}

/// Folder key (parent directory of a relative path) to its totals.
pub type FolderSummary = BTreeMap<String, FolderStats>;

/// Where one uploaded file ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub url: String,
    /// Size in bytes
    pub size: u64,
}

/// Relative path to the upload result for that path.
pub type ResultSummary = BTreeMap<String, SummaryEntry>;

/// Outcome of a single-file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upload {
    /// The file was stored and recorded.
    Uploaded {
        /// Relative path, the key for the result summary
        path: String,
        entry: SummaryEntry,
    },
    /// The asset path was already recorded; nothing was done.
    Skipped(String),
}
