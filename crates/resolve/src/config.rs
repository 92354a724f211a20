//! Configuration read from the process environment.
//!
//! Every recognized key is listed in [`keys`]. Values are read once at
//! startup; an empty value counts as unset.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::rules::Roots;

/// Environment keys.
pub mod keys {
    pub const CUSTOM_STEAM_PATH: &str = "custom_steam_path";
    pub const STEAM_PATH64: &str = "steam_path64";
    pub const STEAM_PATH32: &str = "steam_path32";
    pub const CUSTOM_UBISOFT_PATH: &str = "custom_ubisoft_path";
    pub const UBISOFT_PATH64: &str = "ubisoft_connect_path64";
    pub const UBISOFT_PATH32: &str = "ubisoft_connect_path32";
    pub const PATH_TO_GAME: &str = "path_to_game";
    pub const BACKUP_DIR: &str = "backup_dir";
    pub const STEAM_USER_ID: &str = "steam_user_id";
    pub const STEAM_ACC_ID: &str = "steam_acc_id";
    pub const UBISOFT_USER_ID: &str = "ubisoft_user_id";
    pub const CANDIDATE_TABLE: &str = "candidate_table";
    pub const RESOLVED_TABLE: &str = "resolved_table";
    pub const LOOKUP_CONCURRENCY: &str = "lookup_concurrency";
    pub const LOOKUP_TIMEOUT_SECS: &str = "lookup_timeout_secs";

    /// Identity keys, in the order identities are checked.
    pub const IDENTITIES: [&str; 3] = [STEAM_USER_ID, STEAM_ACC_ID, UBISOFT_USER_ID];
}

pub const DEFAULT_PATH_TO_GAME: &str = r"\steamapps\common";
pub const DEFAULT_CANDIDATE_TABLE: &str = "steam_paths.json";
pub const DEFAULT_RESOLVED_TABLE: &str = "steam_paths_final.json";
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 8;
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 30;

/// Pointer width of the running build; selects the default install roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    X86,
}

impl Arch {
    pub fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            Arch::X64
        } else {
            Arch::X86
        }
    }
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Steam install root.
    pub steam_root: String,
    /// Ubisoft Connect install root, if configured.
    pub ubisoft_root: Option<String>,
    /// Fragment between the Steam root and a title's install dir.
    pub path_to_game: String,
    /// Backup destination root; only the backup stages need it.
    pub backup_dir: Option<PathBuf>,
    /// Local identities substituted for the user marker.
    pub identities: Vec<String>,
    pub candidate_table: PathBuf,
    pub resolved_table: PathBuf,
    /// Maximum wiki requests in flight.
    pub lookup_concurrency: usize,
    /// Per-request timeout for wiki and store lookups.
    pub lookup_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), Arch::current())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        arch: Arch,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let steam_default = match arch {
            Arch::X64 => keys::STEAM_PATH64,
            Arch::X86 => keys::STEAM_PATH32,
        };
        let steam_root = get(keys::CUSTOM_STEAM_PATH)
            .or_else(|| get(steam_default))
            .ok_or_else(|| ConfigError::Missing {
                key: format!("{} or {steam_default}", keys::CUSTOM_STEAM_PATH),
            })?;

        let ubisoft_default = match arch {
            Arch::X64 => keys::UBISOFT_PATH64,
            Arch::X86 => keys::UBISOFT_PATH32,
        };
        let ubisoft_root = get(keys::CUSTOM_UBISOFT_PATH).or_else(|| get(ubisoft_default));

        let identities = keys::IDENTITIES.iter().filter_map(|&key| get(key)).collect();

        let lookup_concurrency = parse_positive(
            keys::LOOKUP_CONCURRENCY,
            get(keys::LOOKUP_CONCURRENCY),
            DEFAULT_LOOKUP_CONCURRENCY as u64,
        )? as usize;
        let lookup_timeout = Duration::from_secs(parse_positive(
            keys::LOOKUP_TIMEOUT_SECS,
            get(keys::LOOKUP_TIMEOUT_SECS),
            DEFAULT_LOOKUP_TIMEOUT_SECS,
        )?);

        Ok(Self {
            steam_root,
            ubisoft_root,
            path_to_game: get(keys::PATH_TO_GAME)
                .unwrap_or_else(|| DEFAULT_PATH_TO_GAME.to_string()),
            backup_dir: get(keys::BACKUP_DIR).map(PathBuf::from),
            identities,
            candidate_table: get(keys::CANDIDATE_TABLE)
                .map_or_else(|| PathBuf::from(DEFAULT_CANDIDATE_TABLE), PathBuf::from),
            resolved_table: get(keys::RESOLVED_TABLE)
                .map_or_else(|| PathBuf::from(DEFAULT_RESOLVED_TABLE), PathBuf::from),
            lookup_concurrency,
            lookup_timeout,
        })
    }

    /// Returns the roots used for semantic-token substitution.
    pub fn roots(&self) -> Roots {
        Roots {
            steam: self.steam_root.clone(),
            ubisoft: self.ubisoft_root.clone(),
            path_to_game: self.path_to_game.clone(),
        }
    }

    /// Returns the backup root, failing if it is not configured.
    pub fn backup_dir(&self) -> Result<&Path, ConfigError> {
        self.backup_dir.as_deref().ok_or_else(|| ConfigError::Missing {
            key: keys::BACKUP_DIR.to_string(),
        })
    }
}

fn parse_positive(key: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            value,
            reason: "must be at least 1".into(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
    }
}
