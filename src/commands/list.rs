//! Recorded asset listing.

use crate::error::{ErrorKind, Result};
use crate::output;
use clap::Args;
use exn::ResultExt;
use stash_config::Config;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print assets as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: &ListArgs, config: &Config) -> Result<()> {
    let (db, repo) = super::open_catalog(config).await?;
    let assets = repo.list_assets().await;
    db.close().await;
    output::assets(&assets.or_raise(|| ErrorKind::Catalog)?, args.json)
}
