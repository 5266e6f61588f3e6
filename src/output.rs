//! The feed artifact on disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::listing::ListingRecord;

/// Render records as the pretty-printed JSON feed.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_feed(records: &[ListingRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize feed")
}

/// Write the feed to `path`, replacing any previous file.
///
/// The JSON goes to a sibling temp file first and is renamed into place, so
/// readers never see a half-written feed.
///
/// # Errors
///
/// Returns an error if the file cannot be written or renamed.
pub async fn write_feed(path: &Path, records: &[ListingRecord]) -> Result<()> {
    let json = render_feed(records)?;
    let tmp = temp_path(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tokio::fs::write(&tmp, json.as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e).with_context(|| format!("Failed to move feed into {}", path.display()));
    }

    debug!(path = %path.display(), count = records.len(), "Feed written");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("feed"), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}
