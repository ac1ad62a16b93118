//! Configuration for stash.
//!
//! Sources are layered, later ones overriding earlier ones:
//! 1. built-in defaults (per-user data directory),
//! 2. a TOML file (`--config`, else `stash.toml` in the user config directory),
//! 3. environment variables prefixed `STASH_`, with `__` separating nested
//!    keys (`STASH_STORAGE__BUCKET=assets`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "stash.toml";
const ENV_PREFIX: &str = "STASH_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite catalog file; created on first use
    pub path: PathBuf,
}

/// Which storage backend to upload to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    Local {
        name: String,
        /// Directory objects are written into
        root: PathBuf,
        /// Url the root directory is served at
        base_url: String,
    },
    S3 {
        name: String,
        bucket: String,
        region: String,
        #[serde(default)]
        endpoint: Option<String>,
        #[serde(default)]
        prefix: Option<String>,
        #[serde(default)]
        public_url: Option<String>,
        key_id: String,
        key_secret: String,
    },
}

impl StorageConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::Local { name, .. } | Self::S3 { name, .. } => name,
        }
    }
}

impl Config {
    /// Defaults rooted in the per-user data directory.
    pub fn defaults() -> Result<Self> {
        let dirs = project_dirs()?;
        Ok(Self::defaults_in(dirs.data_dir()))
    }

    fn defaults_in(data_dir: &Path) -> Self {
        let root = data_dir.join("objects");
        Self {
            database: DatabaseConfig {
                path: data_dir.join("catalog.sqlite"),
            },
            storage: StorageConfig::Local {
                name: "local".to_string(),
                base_url: format!("file://{}", root.display()),
                root,
            },
        }
    }

    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
    }

    /// Load configuration from all sources.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        tracing::debug!(path = %file.display(), "Loading configuration");
        Self::figment(Self::defaults()?, &file).extract().or_raise(|| ErrorKind::Load)
    }

    fn figment(defaults: Self, file: &Path) -> Figment {
        Figment::from(Serialized::defaults(defaults))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "stash").ok_or_raise(|| ErrorKind::NoDirectories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn defaults() -> Config {
        Config::defaults_in(Path::new("/data/stash"))
    }

    fn extract(jail: &Jail, file: &str) -> figment::Result<Config> {
        Config::figment(defaults(), &jail.directory().join(file)).extract()
    }

    #[test]
    fn test_defaults() {
        let config = defaults();
        assert_eq!(config.database.path, Path::new("/data/stash/catalog.sqlite"));
        assert_eq!(
            config.storage,
            StorageConfig::Local {
                name: "local".to_string(),
                root: PathBuf::from("/data/stash/objects"),
                base_url: "file:///data/stash/objects".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|jail| {
            assert_eq!(extract(jail, "missing.toml")?, defaults());
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "stash.toml",
                r#"
                    [database]
                    path = "/srv/catalog.sqlite"

                    [storage]
                    type = "s3"
                    name = "cdn"
                    bucket = "assets"
                    region = "us-west-004"
                    endpoint = "https://s3.us-west-004.backblazeb2.com"
                    key_id = "id"
                    key_secret = "secret"
                "#,
            )?;
            let config = extract(jail, "stash.toml")?;
            assert_eq!(config.database.path, Path::new("/srv/catalog.sqlite"));
            assert_eq!(config.storage.name(), "cdn");
            match config.storage {
                StorageConfig::S3 { bucket, endpoint, prefix, .. } => {
                    assert_eq!(bucket, "assets");
                    assert_eq!(endpoint.as_deref(), Some("https://s3.us-west-004.backblazeb2.com"));
                    assert_eq!(prefix, None);
                },
                other => panic!("expected s3 storage, got {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "stash.toml",
                r#"
                    [storage]
                    type = "local"
                    name = "disk"
                    root = "/srv/objects"
                    base_url = "https://static.test"
                "#,
            )?;
            jail.set_env("STASH_STORAGE__BASE_URL", "https://other.test");
            jail.set_env("STASH_DATABASE__PATH", "/tmp/other.sqlite");
            let config = extract(jail, "stash.toml")?;
            assert_eq!(config.database.path, Path::new("/tmp/other.sqlite"));
            assert_eq!(
                config.storage,
                StorageConfig::Local {
                    name: "disk".to_string(),
                    root: PathBuf::from("/srv/objects"),
                    base_url: "https://other.test".to_string(),
                }
            );
            Ok(())
        });
    }

    #[test]
    fn test_invalid_storage_type() {
        Jail::expect_with(|jail| {
            jail.create_file("stash.toml", "[storage]\ntype = \"ftp\"\n")?;
            assert!(extract(jail, "stash.toml").is_err());
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&temp_dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }
}
