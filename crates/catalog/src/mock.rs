//! In-memory catalog for testing.

use crate::asset::{Asset, encode_path};
use crate::catalog::AssetDatabase;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// In-memory [`AssetDatabase`] that records every call.
///
/// Existence checks answer from the seeded paths plus everything saved so far.
/// Saved batches and looked-up paths are kept (in order) so tests can assert
/// on exactly what the uploader asked for.
///
/// # Examples
///
/// ```
/// use stash_catalog::{AssetDatabase, MockCatalog};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = MockCatalog::default().with_paths(["assets/a.txt"]);
/// assert!(catalog.asset_path_exists("assets/a.txt").await.map_err(|e| format!("{e:?}"))?);
/// assert_eq!(catalog.lookups().await, vec!["assets/a.txt".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MockCatalog {
    /// Encoded paths considered recorded
    known: RwLock<HashSet<String>>,
    saved: RwLock<Vec<Vec<Asset>>>,
    lookups: RwLock<Vec<String>>,
    fail_lookups: bool,
    fail_saves: bool,
}

impl MockCatalog {
    /// Seed the catalog with already-recorded full asset paths.
    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known.get_mut().extend(paths.into_iter().map(|p| encode_path(p.as_ref())));
        self
    }

    /// Fail every existence check with a database error. Lookups are still
    /// recorded.
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Fail every save with a database error; nothing is recorded.
    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// Every successfully saved batch passed to [`save_assets`](AssetDatabase::save_assets), in order.
    pub async fn saved(&self) -> Vec<Vec<Asset>> {
        self.saved.read().await.clone()
    }

    /// Every path passed to [`asset_path_exists`](AssetDatabase::asset_path_exists), in order.
    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }
}

#[async_trait]
impl AssetDatabase for MockCatalog {
    async fn save_assets(&self, assets: Vec<Asset>) -> Result<()> {
        if self.fail_saves {
            exn::bail!(ErrorKind::Database);
        }
        let mut known = self.known.write().await;
        if let Some(dup) = assets.iter().find(|a| known.contains(&a.encoded_path)) {
            exn::bail!(ErrorKind::AlreadyExists(dup.encoded_path.clone()));
        }
        known.extend(assets.iter().map(|a| a.encoded_path.clone()));
        self.saved.write().await.push(assets);
        Ok(())
    }

    async fn asset_path_exists(&self, asset_path: &str) -> Result<bool> {
        self.lookups.write().await.push(asset_path.to_string());
        if self.fail_lookups {
            exn::bail!(ErrorKind::Database);
        }
        Ok(self.known.read().await.contains(&encode_path(asset_path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(asset_path: &str) -> Asset {
        Asset {
            id: "id".to_string(),
            url: "https://cdn.test/x".to_string(),
            download_url: None,
            expected_hash: None,
            total_size: Some(1),
            encoded_path: encode_path(asset_path),
            path: asset_path.to_string(),
        }
    }

    #[tokio::test]
    async fn test_seeded_paths_exist() {
        let catalog = MockCatalog::default().with_paths(["assets/a.txt"]);
        assert!(catalog.asset_path_exists("assets/a.txt").await.unwrap());
        assert!(!catalog.asset_path_exists("assets/b.txt").await.unwrap());
        assert_eq!(catalog.lookups().await, vec!["assets/a.txt", "assets/b.txt"]);
    }

    #[tokio::test]
    async fn test_saved_assets_exist() {
        let catalog = MockCatalog::default();
        catalog.save_assets(vec![asset("assets/a.txt")]).await.unwrap();
        assert!(catalog.asset_path_exists("assets/a.txt").await.unwrap());
        assert_eq!(catalog.saved().await, vec![vec![asset("assets/a.txt")]]);
    }

    #[tokio::test]
    async fn test_duplicate_rejected() {
        let catalog = MockCatalog::default().with_paths(["assets/a.txt"]);
        let err = catalog.save_assets(vec![asset("assets/a.txt")]).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
        assert!(catalog.saved().await.is_empty());
    }

    #[tokio::test]
    async fn test_failing_lookups() {
        let catalog = MockCatalog::default().with_paths(["assets/a.txt"]).failing_lookups();
        let err = catalog.asset_path_exists("assets/a.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Database));
        assert_eq!(catalog.lookups().await, vec!["assets/a.txt"]);
    }

    #[tokio::test]
    async fn test_failing_saves() {
        let catalog = MockCatalog::default().failing_saves();
        let err = catalog.save_assets(vec![asset("assets/a.txt")]).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Database));
        assert!(catalog.saved().await.is_empty());
        assert!(!catalog.asset_path_exists("assets/a.txt").await.unwrap());
    }
}
