use crate::asset::Asset;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Shared, thread-safe handle to any catalog implementation.
pub type CatalogHandle = Arc<dyn AssetDatabase + Send + Sync>;

/// Persistence capability for uploaded asset metadata.
///
/// Implementations must be safe to share between tasks; the uploader holds a
/// [`CatalogHandle`] and calls these methods on `&self`.
#[async_trait]
pub trait AssetDatabase: Send + Sync {
    /// Append a batch of assets.
    ///
    /// Saving an asset whose encoded path is already recorded is an error
    /// ([`AlreadyExists`](crate::error::ErrorKind::AlreadyExists)); the batch
    /// is saved all-or-nothing.
    async fn save_assets(&self, assets: Vec<Asset>) -> Result<()>;

    /// Whether an asset with the given *full* asset path (`folder/relative`)
    /// is already recorded. The path is encoded with
    /// [`encode_path`](crate::encode_path) before lookup.
    async fn asset_path_exists(&self, asset_path: &str) -> Result<bool>;
}
