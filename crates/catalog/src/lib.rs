//! Asset catalog for stash.
//!
//! The catalog records one [`Asset`] per uploaded file and answers the one
//! question the uploader needs before uploading: "is this path already
//! recorded?". The uploader only ever talks to a [`CatalogHandle`]; the
//! SQLite-backed [`Repository`] is the bundled implementation.
//!
//! # Architecture
//! - [`AssetDatabase`]: the persistence capability (append-only batch save,
//!   existence check keyed on the full asset path).
//! - [`Database`]: connection pool management and embedded migrations.
//! - [`Repository`]: [`AssetDatabase`] over a [`Database`] pool, plus the
//!   read queries used for listing.

mod asset;
mod catalog;
mod db;
pub mod error;
#[cfg(feature = "mock")]
mod mock;
mod models;
mod repo;

pub use crate::asset::{Asset, encode_path};
pub use crate::catalog::{AssetDatabase, CatalogHandle};
pub use crate::db::Database;
#[cfg(feature = "mock")]
pub use crate::mock::MockCatalog;
pub use crate::repo::Repository;
