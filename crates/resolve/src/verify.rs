//! Per-identity expansion and on-disk existence check of candidate paths.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ResolveError;
use crate::expand::{expand_user, expand_vars, to_native_path};
use crate::table;
use crate::types::{CandidateEntry, VerifiedEntry};

/// Verifies candidates against the process environment.
pub fn verify(candidates: &[CandidateEntry], identities: &[String]) -> Vec<VerifiedEntry> {
    verify_with(candidates, identities, |name| std::env::var(name).ok())
}

/// Verifies candidates, expanding variables through `lookup`.
///
/// Each identity is tried against every candidate. A path is kept the
/// first time it is found to exist; later duplicates are dropped, even
/// under a different appid.
pub fn verify_with(
    candidates: &[CandidateEntry],
    identities: &[String],
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<VerifiedEntry> {
    let mut seen = HashSet::new();
    let mut verified = Vec::new();

    for identity in identities {
        for candidate in candidates {
            let expanded = expand_vars(&expand_user(&candidate.path, identity), &lookup);
            let path = to_native_path(&expanded).into_owned();

            let exists = Path::new(&path).exists();
            debug!(appid = %candidate.appid, %identity, %path, exists, "checked save path");
            if exists && seen.insert(path.clone()) {
                verified.push(VerifiedEntry {
                    appid: candidate.appid.clone(),
                    path,
                });
            }
        }
    }

    if verified.is_empty() {
        info!(
            candidates = candidates.len(),
            identities = identities.len(),
            "no save paths found on disk"
        );
    } else {
        info!(count = verified.len(), "verified save paths");
    }
    verified
}

/// Verifies candidates and replaces the resolved table at `table_path`.
pub fn verify_and_persist(
    candidates: &[CandidateEntry],
    identities: &[String],
    table_path: &Path,
) -> Result<Vec<VerifiedEntry>, ResolveError> {
    let verified = verify(candidates, identities);
    table::write_resolved(table_path, &verified)?;
    Ok(verified)
}
