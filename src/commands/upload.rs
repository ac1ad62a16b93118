//! File upload CLI command.

use crate::backend;
use crate::error::{ErrorKind, Result};
use crate::output;
use clap::Args;
use exn::ResultExt;
use stash_config::Config;
use stash_uploader::{AssetUploader, FileWithPath, ResultSummary};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload; a relative path is kept under the base path, while an
    /// absolute path or one containing `..` is uploaded by file name only
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Folder to upload into
    #[arg(short, long, default_value = "")]
    pub base_path: String,

    /// Upload straight to storage without checking or updating the catalog
    #[arg(long)]
    pub storage_only: bool,

    /// Parent folder id passed to the storage backend (storage-only mode, repeatable)
    #[arg(long = "parent-id", requires = "storage_only")]
    pub parent_ids: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the upload command
pub async fn execute(args: &UploadArgs, config: &Config) -> Result<()> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(read_file(path).await?);
    }
    let storage = backend::from_config(&config.storage)?;
    let (db, repo) = super::open_catalog(config).await?;
    let mut uploader = AssetUploader::new(Arc::new(repo), storage);

    let outcome = match args.storage_only {
        true => uploader
            .upload_storage_only(files, &args.base_path, &args.parent_ids)
            .await
            .map(|summary| output::upload(&summary, None, args.json)),
        false => uploader
            .upload_multiple(files, &args.base_path, ResultSummary::new())
            .await
            .map(|summary| output::upload(&summary, Some(uploader.folder_summary()), args.json)),
    };
    db.close().await;
    outcome.or_raise(|| ErrorKind::Upload)?
}

async fn read_file(path: &Path) -> Result<FileWithPath> {
    let data = tokio::fs::read(path).await.or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let relative_path = relative_path(path, &name);
    Ok(FileWithPath::new(name, data).with_relative_path(relative_path))
}

/// Path a command-line file is stored under, relative to the base path.
fn relative_path(path: &Path, name: &str) -> String {
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_) | Component::ParentDir));
    match escapes {
        true => name.to_string(),
        false => path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn test_read_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("example.txt");
        std::fs::write(&path, b"Hello, World!").unwrap();
        let file = read_file(&path).await.unwrap();
        assert_eq!(file.name, "example.txt");
        assert_eq!(file.data, b"Hello, World!");
        // Absolute paths are uploaded by name.
        assert_eq!(file.relative_path.as_deref(), Some("example.txt"));
        assert_eq!(file.mimetype, None);
    }

    #[rstest]
    #[case("dir/a.txt", "dir/a.txt")]
    #[case("./dir/a.txt", "dir/a.txt")]
    #[case("a.txt", "a.txt")]
    #[case("/home/u/pic.png", "pic.png")]
    #[case("../x.txt", "x.txt")]
    #[case("dir/../../x.txt", "x.txt")]
    fn test_relative_path(#[case] given: &str, #[case] expected: &str) {
        let path = Path::new(given);
        let name = path.file_name().unwrap().to_string_lossy();
        assert_eq!(relative_path(path, &name), expected);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_file(Path::new("/definitely/not/here.txt")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Read(_)));
    }

    #[tokio::test]
    async fn test_upload_to_local_backend() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("example.txt");
        std::fs::write(&source, b"Hello, World!").unwrap();
        let config = Config {
            database: stash_config::DatabaseConfig {
                path: temp_dir.path().join("catalog.sqlite"),
            },
            storage: stash_config::StorageConfig::Local {
                name: "disk".to_string(),
                root: temp_dir.path().join("objects"),
                base_url: "https://static.test".to_string(),
            },
        };
        let args = UploadArgs {
            files: vec![source.clone()],
            base_path: "assets".to_string(),
            storage_only: false,
            parent_ids: Vec::new(),
            json: true,
        };
        execute(&args, &config).await.unwrap();
        // Running again skips the already-recorded file.
        execute(&args, &config).await.unwrap();

        let (db, repo) = super::super::open_catalog(&config).await.unwrap();
        assert_eq!(repo.count_assets().await.unwrap(), 1);
        db.close().await;
        // The base path appears in both the folder and the relative path.
        let stored = temp_dir.path().join("objects/assets/assets/example.txt");
        assert_eq!(std::fs::read(stored).unwrap(), b"Hello, World!");
    }
}
