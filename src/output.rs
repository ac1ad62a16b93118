//! Text and JSON output for CLI commands.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde_json::json;
use stash_catalog::Asset;
use stash_uploader::{FolderSummary, ResultSummary};
use std::fmt::Write;

/// Print the result of an upload, with folder statistics when available.
pub fn upload(summary: &ResultSummary, folders: Option<&FolderSummary>, as_json: bool) -> Result<()> {
    let rendered = match as_json {
        true => {
            let value = match folders {
                Some(folders) => json!({ "uploaded": summary, "folders": folders }),
                None => json!({ "uploaded": summary }),
            };
            serde_json::to_string_pretty(&value).or_raise(|| ErrorKind::Output)?
        },
        false => render_upload(summary, folders),
    };
    println!("{rendered}");
    Ok(())
}

fn render_upload(summary: &ResultSummary, folders: Option<&FolderSummary>) -> String {
    let mut out = String::new();
    if summary.is_empty() {
        out.push_str("Nothing uploaded.");
    }
    for (path, entry) in summary {
        _ = write!(out, "\n{path}  {} bytes  {}", entry.size, entry.url);
    }
    if let Some(folders) = folders.filter(|f| !f.is_empty()) {
        out.push_str("\n\nFolders:");
        for (folder, stats) in folders {
            _ = write!(out, "\n{folder}  {} files  {} bytes", stats.count, stats.size);
        }
    }
    out.trim_start_matches('\n').to_string()
}

/// Print recorded assets.
pub fn assets(assets: &[Asset], as_json: bool) -> Result<()> {
    let rendered = match as_json {
        true => serde_json::to_string_pretty(assets).or_raise(|| ErrorKind::Output)?,
        false => render_assets(assets),
    };
    println!("{rendered}");
    Ok(())
}

fn render_assets(assets: &[Asset]) -> String {
    if assets.is_empty() {
        return "No assets recorded.".to_string();
    }
    assets
        .iter()
        .map(|a| match a.total_size {
            Some(size) => format!("{}  {}  {size} bytes  {}", a.id, a.encoded_path, a.url),
            None => format!("{}  {}  {}", a.id, a.encoded_path, a.url),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_uploader::{FolderStats, SummaryEntry};

    fn summary() -> ResultSummary {
        ResultSummary::from([(
            "folder1/example.txt".to_string(),
            SummaryEntry {
                url: "https://cdn.test/example.txt".to_string(),
                size: 13,
            },
        )])
    }

    #[test]
    fn test_render_upload() {
        let folders = FolderSummary::from([("folder1".to_string(), FolderStats { count: 1, size: 13 })]);
        assert_eq!(
            render_upload(&summary(), Some(&folders)),
            "folder1/example.txt  13 bytes  https://cdn.test/example.txt\n\nFolders:\nfolder1  1 files  13 bytes"
        );
    }

    #[test]
    fn test_render_upload_without_folders() {
        assert_eq!(
            render_upload(&summary(), None),
            "folder1/example.txt  13 bytes  https://cdn.test/example.txt"
        );
        assert_eq!(render_upload(&ResultSummary::new(), Some(&FolderSummary::new())), "Nothing uploaded.");
    }

    #[test]
    fn test_render_assets() {
        assert_eq!(render_assets(&[]), "No assets recorded.");
        let asset = Asset {
            id: "asset-1".to_string(),
            url: "https://cdn.test/a.txt".to_string(),
            download_url: None,
            expected_hash: None,
            total_size: Some(3),
            encoded_path: "assets%2Fa.txt".to_string(),
            path: "a.txt".to_string(),
        };
        assert_eq!(render_assets(&[asset]), "asset-1  assets%2Fa.txt  3 bytes  https://cdn.test/a.txt");
    }
}
