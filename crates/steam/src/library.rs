//! Installed-title discovery across all Steam library folders.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::SteamError;
use crate::paths::{self, Paths};
use crate::vdf::{self, KeyValues, Value};

/// An installed Steam title, as described by its app manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub appid: String,
    pub name: String,
    #[serde(rename = "installdir")]
    pub install_dir: String,
}

/// Returns every library folder listed in `libraryfolders.vdf`.
///
/// The base installation is always included, first, even when the
/// descriptor omits it.
pub fn library_folders(paths: &Paths) -> Result<Vec<PathBuf>, SteamError> {
    let descriptor = paths.library_folders_path();
    if !descriptor.exists() {
        return Err(SteamError::NotFound);
    }
    let kv = vdf::load_vdf(&descriptor)?;
    let root = kv
        .get_object("libraryfolders")
        .ok_or_else(|| SteamError::Vdf("missing 'libraryfolders' root".into()))?;

    let mut folders = vec![paths.base_dir().to_path_buf()];
    for folder in folder_paths(root) {
        let folder = PathBuf::from(folder);
        if !folders.contains(&folder) {
            folders.push(folder);
        }
    }
    Ok(folders)
}

/// Extracts folder paths from both descriptor layouts: the current one
/// (`"0" { "path" "..." }`) and the legacy one (`"1" "..."`).
fn folder_paths(root: &KeyValues) -> Vec<&str> {
    root.iter()
        .filter_map(|(key, value)| match value {
            Value::Object(entry) => entry.get_str("path"),
            Value::Str(path) if key.parse::<u32>().is_ok() => Some(path.as_str()),
            Value::Str(_) => None,
        })
        .filter(|path| !path.is_empty())
        .collect()
}

/// Lists installed titles in the given library folders.
///
/// A library whose `steamapps` directory cannot be read, or a manifest
/// that fails to parse, is logged and skipped; the rest of the scan
/// continues.
pub fn installed_games(libraries: &[PathBuf]) -> Vec<GameRecord> {
    let mut games = Vec::new();
    for library in libraries {
        match library_games(library) {
            Ok(found) => {
                debug!(library = %library.display(), count = found.len(), "scanned library");
                games.extend(found);
            }
            Err(e) => warn!(library = %library.display(), error = %e, "skipping library"),
        }
    }
    games
}

/// Discovers all installed titles of a Steam installation.
pub fn discover(paths: &Paths) -> Result<Vec<GameRecord>, SteamError> {
    let libraries = library_folders(paths)?;
    Ok(installed_games(&libraries))
}

fn library_games(library: &Path) -> Result<Vec<GameRecord>, SteamError> {
    let steamapps = paths::steamapps_dir(library);
    let entries = fs::read_dir(&steamapps)
        .map_err(|e| SteamError::Io(format!("failed to read {}: {e}", steamapps.display())))?;

    let mut manifests: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| paths::is_app_manifest(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect();
    manifests.sort();

    let mut games = Vec::new();
    for manifest in manifests {
        match read_manifest(&manifest) {
            Ok(Some(game)) => games.push(game),
            Ok(None) => debug!(manifest = %manifest.display(), "manifest without install metadata"),
            Err(e) => warn!(manifest = %manifest.display(), error = %e, "unreadable manifest"),
        }
    }
    Ok(games)
}

/// Reads one `appmanifest_*.acf` file.
///
/// Returns `Ok(None)` when the manifest lacks an appid or install dir.
pub fn read_manifest(path: &Path) -> Result<Option<GameRecord>, SteamError> {
    let kv = vdf::load_vdf(path)?;
    Ok(game_from_manifest(&kv))
}

fn game_from_manifest(kv: &KeyValues) -> Option<GameRecord> {
    let state = kv.get_object("AppState")?;
    let appid = state.get_str("appid").filter(|s| !s.is_empty())?;
    let install_dir = state.get_str("installdir").filter(|s| !s.is_empty())?;
    Some(GameRecord {
        appid: appid.to_string(),
        name: state.get_str("name").unwrap_or_default().to_string(),
        install_dir: install_dir.to_string(),
    })
}
