//! Store-name dump for backed-up titles.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use futures_util::stream;
use savekeep_resolve::VerifiedEntry;
use savekeep_steam::StoreClient;
use tracing::{debug, warn};

use crate::error::BackupError;

/// File written under the backup root.
pub const NAMES_FILE: &str = "output.txt";

/// Looks up the store name of every distinct appid in `entries`.
///
/// Returns `(appid, name)` pairs in first-seen order. Titles whose lookup
/// fails, or that the store does not know, are logged and left out.
pub async fn fetch_names(
    client: &StoreClient,
    entries: &[VerifiedEntry],
    concurrency: usize,
) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let appids: Vec<&str> = entries
        .iter()
        .map(|e| e.appid.as_str())
        .filter(|appid| seen.insert(*appid))
        .collect();

    let mut found: HashMap<&str, String> = stream::iter(appids.iter().copied())
        .map(|appid| async move { (appid, client.app_name(appid).await) })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|(appid, result)| async move {
            match result {
                Ok(Some(name)) => Some((appid, name)),
                Ok(None) => {
                    debug!(appid, "store has no details");
                    None
                }
                Err(e) => {
                    warn!(appid, error = %e, "store lookup failed");
                    None
                }
            }
        })
        .collect()
        .await;

    appids
        .into_iter()
        .filter_map(|appid| found.remove(appid).map(|name| (appid.to_string(), name)))
        .collect()
}

/// Writes one `appid=name,` line per title to `<dir>/output.txt`.
pub fn write_names(dir: &Path, names: &[(String, String)]) -> Result<PathBuf, BackupError> {
    fs::create_dir_all(dir).map_err(BackupError::io(dir))?;
    let path = dir.join(NAMES_FILE);
    let contents: String = names
        .iter()
        .map(|(appid, name)| format!("{appid}={name},\n"))
        .collect();
    fs::write(&path, contents).map_err(BackupError::io(&path))?;
    Ok(path)
}
