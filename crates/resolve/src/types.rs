//! Rows of the candidate and resolved tables.

use serde::{Deserialize, Serialize};

/// Marker left in candidate paths where the per-user id goes.
pub const USER_MARKER: &str = "{}";

/// A save path after semantic-token substitution. Not yet user-scoped
/// and not yet checked on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub appid: String,
    pub path: String,
}

/// A fully expanded save path that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedEntry {
    pub appid: String,
    pub path: String,
}
