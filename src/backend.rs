use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use stash_config::StorageConfig;
use stash_storage::BackendHandle;
use stash_storage::backend::{LocalBackend, S3Backend};
use std::sync::Arc;

/// Build the configured storage backend.
pub fn from_config(config: &StorageConfig) -> Result<BackendHandle> {
    let backend: BackendHandle = match config.clone() {
        StorageConfig::Local { name, root, base_url } => {
            Arc::new(LocalBackend::new(name, root, base_url).or_raise(|| ErrorKind::Storage)?)
        },
        StorageConfig::S3 {
            name,
            bucket,
            region,
            endpoint,
            prefix,
            public_url,
            key_id,
            key_secret,
        } => Arc::new(
            S3Backend::new(name, bucket, prefix, region, endpoint, public_url, key_id, key_secret)
                .or_raise(|| ErrorKind::Storage)?,
        ),
    };
    tracing::debug!(backend = backend.name(), "Storage backend ready");
    Ok(backend)
}
