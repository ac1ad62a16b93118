use crate::error::{ErrorKind, Result};
use crate::ident;
use crate::mime;
use crate::models::{FileWithPath, FolderStats, FolderSummary, ResultSummary, SummaryEntry, Upload, UploadObject};
use exn::ResultExt;
use stash_catalog::{Asset, CatalogHandle, encode_path};
use stash_storage::path::{join, parent};
use stash_storage::{BackendHandle, StoredObject, UploadFile, UploadRequest};
use tracing::instrument;

/// Uploads files to a storage backend, skipping any asset path the catalog
/// already knows about, and keeps per-folder statistics of what it uploaded.
///
/// Files are processed strictly one after another; the first failing
/// collaborator call aborts the rest of a batch. Nothing is rolled back, so a
/// file can be stored without being recorded. Re-running the same batch is
/// safe: recorded files are skipped.
///
/// The existence check and the save are separate calls, so two uploaders
/// sharing a catalog can race to upload the same path.
pub struct AssetUploader {
    catalog: CatalogHandle,
    storage: BackendHandle,
    folder_summary: FolderSummary,
}

impl AssetUploader {
    pub fn new(catalog: CatalogHandle, storage: BackendHandle) -> Self {
        Self {
            catalog,
            storage,
            folder_summary: FolderSummary::new(),
        }
    }

    /// Upload and record one file, unless its asset path
    /// (`folder/relative_path`) is already recorded.
    ///
    /// On upload the folder statistics for the parent directory of the
    /// relative path are updated, and the returned [`Upload::Uploaded`]
    /// carries the entry for the caller's result summary.
    #[instrument(skip_all, fields(folder = %object.folder, path = %object.relative_path))]
    pub async fn upload_single(&mut self, object: UploadObject) -> Result<Upload> {
        let asset_path = format!("{}/{}", object.folder, object.relative_path);
        if self.catalog.asset_path_exists(&asset_path).await.or_raise(|| ErrorKind::Lookup)? {
            tracing::info!(asset_path = %asset_path, "Asset already recorded; skipping upload");
            return Ok(Upload::Skipped(asset_path));
        }
        let request = UploadRequest {
            file: UploadFile {
                name: &object.relative_path,
                mimetype: &object.mimetype,
                data: &object.data,
                uri: &asset_path,
            },
            upload_path: &object.folder,
            parent_path_ids: object.parent_path_ids.as_deref().unwrap_or_default(),
        };
        let stored = self.storage.upload_file(request).await.or_raise(|| ErrorKind::Storage)?;
        let size = object.data.len() as u64;
        let entry = SummaryEntry {
            url: stored.url.clone(),
            size,
        };
        let asset = new_asset(stored, &asset_path, &object.relative_path, size);
        self.catalog.save_assets(vec![asset]).await.or_raise(|| ErrorKind::Save)?;
        self.folder_summary.entry(parent(&object.relative_path).to_string()).or_default().record(size);
        tracing::debug!(
            backend = self.storage.name(),
            asset_path = %asset_path,
            size_bytes = size,
            "Uploaded and recorded asset"
        );
        Ok(Upload::Uploaded {
            path: object.relative_path,
            entry,
        })
    }

    /// Upload and record a batch of files into `base_path`, in order.
    ///
    /// Each file's relative path is `base_path` (minus one leading `/`) joined
    /// with the file's relative path, or its name. Uploaded files are added to
    /// `summary`, which is returned; skipped files leave it untouched.
    pub async fn upload_multiple(
        &mut self,
        files: impl IntoIterator<Item = FileWithPath>,
        base_path: &str,
        mut summary: ResultSummary,
    ) -> Result<ResultSummary> {
        let stripped = base_path.strip_prefix('/').unwrap_or(base_path);
        for file in files {
            let object = UploadObject {
                folder: base_path.to_string(),
                relative_path: join(stripped, file.path()),
                parent_path_ids: None,
                mimetype: mime::resolve(file.mimetype.as_deref(), &file.name),
                data: file.data,
            };
            if let Upload::Uploaded { path, entry } = self.upload_single(object).await? {
                summary.insert(path, entry);
            }
        }
        Ok(summary)
    }

    /// Upload a batch of files straight to storage, without consulting or
    /// updating the catalog (and without touching folder statistics).
    ///
    /// Each file is stored under `base_path` joined with the file's relative
    /// path (or name); `remote_parent_paths` is forwarded to the backend.
    pub async fn upload_storage_only(
        &self,
        files: impl IntoIterator<Item = FileWithPath>,
        base_path: &str,
        remote_parent_paths: &[String],
    ) -> Result<ResultSummary> {
        let mut summary = ResultSummary::new();
        for file in files {
            let relative_path = join(base_path, file.path());
            let mimetype = mime::resolve(file.mimetype.as_deref(), &file.name);
            let request = UploadRequest {
                file: UploadFile {
                    name: &relative_path,
                    mimetype: &mimetype,
                    data: &file.data,
                    uri: &relative_path,
                },
                upload_path: base_path,
                parent_path_ids: remote_parent_paths,
            };
            let stored = self.storage.upload_file(request).await.or_raise(|| ErrorKind::Storage)?;
            tracing::debug!(backend = self.storage.name(), path = %relative_path, "Uploaded file to storage only");
            let size = file.data.len() as u64;
            summary.insert(relative_path, SummaryEntry { url: stored.url, size });
        }
        Ok(summary)
    }

    /// Statistics for everything uploaded (or added) so far.
    pub fn folder_summary(&self) -> &FolderSummary {
        &self.folder_summary
    }

    /// Set the statistics for `folder`, replacing any existing entry.
    pub fn add_folder_stats(&mut self, folder: impl Into<String>, stats: FolderStats) {
        self.folder_summary.insert(folder.into(), stats);
    }
}

fn new_asset(stored: StoredObject, asset_path: &str, relative_path: &str, size: u64) -> Asset {
    Asset {
        id: stored.key.unwrap_or_else(ident::generate),
        url: stored.url,
        download_url: stored.download_url,
        expected_hash: stored.integrity,
        total_size: Some(size),
        encoded_path: encode_path(asset_path),
        path: relative_path.to_string(),
    }
}
