//! Deduplicating asset uploader.
//!
//! [`AssetUploader`] sits between callers with files and two collaborators:
//! a storage backend ([`stash_storage::BackendHandle`]) that holds the bytes,
//! and a catalog ([`stash_catalog::CatalogHandle`]) that remembers which
//! asset paths have been uploaded. Anything the catalog already knows about
//! is skipped.
//!
//! ```no_run
//! use stash_catalog::{Database, Repository};
//! use stash_storage::backend::LocalBackend;
//! use stash_uploader::{AssetUploader, FileWithPath, ResultSummary};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("/var/lib/stash/catalog.sqlite").await.map_err(|e| format!("{e:?}"))?;
//! let storage = LocalBackend::new("local", "/var/lib/stash/objects", "https://static.example.com")
//!     .map_err(|e| format!("{e:?}"))?;
//! let mut uploader = AssetUploader::new(Arc::new(Repository::from(&db)), Arc::new(storage));
//! let files = vec![FileWithPath::new("example.txt", b"Hello, World!".to_vec())];
//! let summary = uploader.upload_multiple(files, "assets", ResultSummary::new()).await.map_err(|e| format!("{e:?}"))?;
//! println!("{summary:?} {:?}", uploader.folder_summary());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ident;
pub mod mime;
mod models;
mod uploader;

pub use crate::models::{FileWithPath, FolderStats, FolderSummary, ResultSummary, SummaryEntry, Upload, UploadObject};
pub use crate::uploader::AssetUploader;
