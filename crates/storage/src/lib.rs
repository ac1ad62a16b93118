//! Object storage for stash.
//!
//! Backends receive raw bytes plus a storage uri and hand back a retrievable
//! location ([`StoredObject`]). Everything above this crate only ever talks
//! to a [`BackendHandle`], so backends can be swapped (or mocked) freely.

pub mod backend;
pub mod error;
mod models;
pub mod path;

pub use crate::backend::StorageBackend;
pub use crate::models::{StoredObject, UploadFile, UploadRequest};
pub use crate::path::validate as validate_path;
use std::sync::Arc;

pub type BackendHandle = Arc<dyn StorageBackend + Send + Sync>;
