//! SQLite-backed asset repository.
//!
//! Assets are append-only: rows are inserted once and never updated. The
//! encoded path is unique, so recording the same asset path twice fails
//! instead of silently replacing the earlier record.

use crate::Database;
use crate::asset::{Asset, encode_path};
use crate::catalog::AssetDatabase;
use crate::error::{ErrorKind, Result};
use crate::models::AssetRow;
use async_trait::async_trait;
use exn::ResultExt;
use sqlx::SqlitePool;
use time::UtcDateTime;
use tracing::instrument;

/// Repository for asset records in the catalog database.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    // =========================================================================
    // Insert
    // =========================================================================

    /// Insert a batch of assets in a single transaction.
    ///
    /// Returns [`ErrorKind::AlreadyExists`] (and inserts nothing) if any asset
    /// in the batch has an encoded path that is already recorded, or appears
    /// twice in the batch.
    #[instrument(skip_all, fields(count = assets.len()))]
    pub async fn insert_assets(&self, assets: &[Asset]) -> Result<()> {
        if assets.is_empty() {
            return Ok(());
        }
        let recorded_at = UtcDateTime::now();
        let rows = assets.iter().map(|a| AssetRow::new(a, recorded_at)).collect::<Result<Vec<_>>>()?;
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        for row in rows {
            let encoded_path = row.encoded_path.clone();
            let inserted = sqlx::query(include_str!("../queries/insert_asset.sql"))
                .bind(row.id)
                .bind(row.path)
                .bind(row.encoded_path)
                .bind(row.url)
                .bind(row.download_url)
                .bind(row.expected_hash)
                .bind(row.total_size)
                .bind(row.recorded_at)
                .execute(&mut *tx)
                .await;
            match inserted {
                Ok(_) => {},
                Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                    // Dropping the transaction rolls it back.
                    exn::bail!(ErrorKind::AlreadyExists(encoded_path));
                },
                Err(e) => return Err(e).or_raise(|| ErrorKind::Database),
            }
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        tracing::debug!("Recorded assets in catalog");
        Ok(())
    }

    // =========================================================================
    // Get/Fetch
    // =========================================================================

    /// Get an asset by its full asset path (`folder/relative/path`).
    pub async fn get_by_path(&self, asset_path: impl AsRef<str>) -> Result<Option<Asset>> {
        self.get_by_encoded_path(encode_path(asset_path.as_ref())).await
    }

    /// Get an asset by its already-encoded path.
    pub async fn get_by_encoded_path(&self, encoded_path: impl AsRef<str>) -> Result<Option<Asset>> {
        let row: Option<AssetRow> = sqlx::query_as(include_str!("../queries/get_by_encoded_path.sql"))
            .bind(encoded_path.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Asset::try_from).transpose()
    }

    // =========================================================================
    // Existence
    // =========================================================================

    /// Check if an asset is recorded under the given already-encoded path.
    pub async fn encoded_path_exists(&self, encoded_path: impl AsRef<str>) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_by_encoded_path.sql"))
            .bind(encoded_path.as_ref())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(count > 0)
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// List all recorded assets, oldest first.
    pub async fn list_assets(&self) -> Result<Vec<Asset>> {
        let rows: Vec<AssetRow> = sqlx::query_as(include_str!("../queries/list_assets.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Asset::try_from).collect()
    }

    /// Count the total number of recorded assets.
    pub async fn count_assets(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_assets.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("asset count"))
    }
}

#[async_trait]
impl AssetDatabase for Repository {
    async fn save_assets(&self, assets: Vec<Asset>) -> Result<()> {
        self.insert_assets(&assets).await
    }

    async fn asset_path_exists(&self, asset_path: &str) -> Result<bool> {
        self.encoded_path_exists(encode_path(asset_path)).await
    }
}
