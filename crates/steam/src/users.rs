//! Local Steam accounts.

use std::fs;
use std::io::ErrorKind;

use crate::SteamError;
use crate::paths::Paths;

/// Account directory Steam creates before anyone signs in.
const PLACEHOLDER_ACCOUNT: &str = "0";

/// Returns the ids of the accounts with a directory under `userdata`,
/// sorted so every run checks them in the same order.
pub fn user_ids(paths: &Paths) -> Result<Vec<String>, SteamError> {
    let dir = paths.user_data_dir();
    let entries = fs::read_dir(&dir).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SteamError::NotFound,
        _ => SteamError::Io(format!("failed to read {}: {e}", dir.display())),
    })?;

    let mut ids: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name != PLACEHOLDER_ACCOUNT && name.parse::<u64>().is_ok())
        .collect();
    ids.sort();
    Ok(ids)
}
