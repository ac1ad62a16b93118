//! CLI command definitions and dispatch.

pub mod list;
pub mod upload;

use crate::error::{ErrorKind, Result};
use clap::{ArgAction, Parser, Subcommand};
use exn::ResultExt;
use stash_catalog::{Database, Repository};
use stash_config::Config;
use std::path::PathBuf;

/// stash: upload files to object storage, skipping anything already catalogued
#[derive(Debug, Parser)]
#[command(name = "stash", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to stash.toml in the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload files
    Upload(upload::UploadArgs),
    /// List recorded assets
    List(list::ListArgs),
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref()).or_raise(|| ErrorKind::Config)?;
        match &self.command {
            Commands::Upload(args) => upload::execute(args, &config).await,
            Commands::List(args) => list::execute(args, &config).await,
        }
    }
}

/// Open the catalog database named in the configuration.
pub async fn open_catalog(config: &Config) -> Result<(Database, Repository)> {
    let db = Database::connect(&config.database.path).await.or_raise(|| ErrorKind::Catalog)?;
    let repo = Repository::from(&db);
    Ok((db, repo))
}
