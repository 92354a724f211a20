//! JSON persistence of the candidate and resolved tables.
//!
//! Both tables are arrays of `{"appid", "path"}` objects and are always
//! replaced whole.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::ResolveError;
use crate::types::{CandidateEntry, VerifiedEntry};

pub fn write_candidates(path: &Path, entries: &[CandidateEntry]) -> Result<(), ResolveError> {
    let mut json = serde_json::to_vec(entries)?;
    json.push(b'\n');
    write(path, &json)
}

pub fn read_candidates(path: &Path) -> Result<Vec<CandidateEntry>, ResolveError> {
    read(path)
}

/// Writes the resolved table, indented four spaces.
pub fn write_resolved(path: &Path, entries: &[VerifiedEntry]) -> Result<(), ResolveError> {
    let mut json = Vec::new();
    let mut ser = Serializer::with_formatter(&mut json, PrettyFormatter::with_indent(b"    "));
    entries.serialize(&mut ser)?;
    json.push(b'\n');
    write(path, &json)
}

pub fn read_resolved(path: &Path) -> Result<Vec<VerifiedEntry>, ResolveError> {
    read(path)
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), ResolveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ResolveError::Table {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| ResolveError::Table {
        path: path.to_path_buf(),
        source,
    })
}

fn read<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ResolveError> {
    let bytes = fs::read(path).map_err(|source| ResolveError::Table {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_table_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("steam_paths.json");
        let entries = vec![CandidateEntry {
            appid: "620".into(),
            path: r"%APPDATA%\Portal 2\{}".into(),
        }];

        write_candidates(&path, &entries).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            "[{\"appid\":\"620\",\"path\":\"%APPDATA%\\\\Portal 2\\\\{}\"}]\n"
        );
        assert_eq!(read_candidates(&path).unwrap(), entries);
    }

    #[test]
    fn resolved_table_is_indented() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out").join("steam_paths_final.json");
        let entries = vec![VerifiedEntry {
            appid: "1".into(),
            path: "/saves/one".into(),
        }];

        write_resolved(&path, &entries).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            "[\n    {\n        \"appid\": \"1\",\n        \"path\": \"/saves/one\"\n    }\n]\n"
        );
        assert_eq!(read_resolved(&path).unwrap(), entries);
    }

    #[test]
    fn empty_table_is_empty_array() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("final.json");
        write_resolved(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn missing_table_names_path() {
        let err = read_candidates(Path::new("/nonexistent/steam_paths.json")).unwrap_err();
        assert!(matches!(err, ResolveError::Table { ref path, .. } if path.ends_with("steam_paths.json")));
    }

    #[test]
    fn malformed_table_is_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_resolved(&path), Err(ResolveError::Json(_))));
    }
}
