//! Wiki lookups for every installed title, and their substitution into
//! candidate paths.
//!
//! Lookups run as a bounded stream with a per-request timeout. Results
//! are keyed by appid, so completion order does not matter.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;
use savekeep_steam::GameRecord;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_LOOKUP_CONCURRENCY, DEFAULT_LOOKUP_TIMEOUT_SECS};
use crate::error::ResolveError;
use crate::rules::{Roots, substitute, token_rules};
use crate::table;
use crate::types::CandidateEntry;

/// Source of raw save-path templates for a title.
///
/// Implemented by the PCGamingWiki client; tests substitute their own.
pub trait SavePathSource: Send + Sync {
    /// Returns the templates documented for `appid`, `None` if there are none.
    fn save_paths<'a>(
        &'a self,
        appid: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<String>>, savekeep_pcgw::Error>> + Send + 'a>>;
}

impl SavePathSource for savekeep_pcgw::Client {
    fn save_paths<'a>(
        &'a self,
        appid: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<String>>, savekeep_pcgw::Error>> + Send + 'a>>
    {
        Box::pin(self.fetch_save_paths(appid))
    }
}

/// Result of one title's lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The wiki lists at least one usable path.
    Found(Vec<String>),
    /// No save section, or nothing usable in it.
    Empty,
    /// Request failed or timed out.
    Failed(String),
}

/// Resolves installed titles into candidate save paths.
pub struct Pipeline<S> {
    source: S,
    roots: Roots,
    concurrency: usize,
    timeout: Duration,
}

impl<S: SavePathSource> Pipeline<S> {
    pub fn new(source: S, roots: Roots) -> Self {
        Self {
            source,
            roots,
            concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
        }
    }

    /// Sets the maximum lookups in flight and the per-lookup timeout.
    pub fn with_limits(mut self, concurrency: usize, timeout: Duration) -> Self {
        self.concurrency = concurrency.max(1);
        self.timeout = timeout;
        self
    }

    /// Looks up every distinct appid and returns the outcomes by appid.
    pub async fn lookup_all(&self, games: &[GameRecord]) -> HashMap<String, LookupOutcome> {
        let mut seen = HashSet::new();
        let appids: Vec<&str> = games
            .iter()
            .map(|g| g.appid.as_str())
            .filter(|appid| seen.insert(*appid))
            .collect();

        stream::iter(appids)
            .map(|appid| async move { (appid.to_string(), self.lookup(appid).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    async fn lookup(&self, appid: &str) -> LookupOutcome {
        let outcome = match tokio::time::timeout(self.timeout, self.source.save_paths(appid)).await {
            Ok(Ok(Some(paths))) => LookupOutcome::Found(paths),
            Ok(Ok(None)) => LookupOutcome::Empty,
            Ok(Err(e)) => LookupOutcome::Failed(e.to_string()),
            Err(_) => LookupOutcome::Failed(format!("timed out after {:?}", self.timeout)),
        };

        match &outcome {
            LookupOutcome::Found(paths) => debug!(appid, count = paths.len(), "save paths found"),
            LookupOutcome::Empty => debug!(appid, "no documented save location"),
            LookupOutcome::Failed(reason) => warn!(appid, %reason, "save path lookup failed"),
        }
        outcome
    }

    /// Substitutes semantic tokens for every title with a `Found` outcome.
    ///
    /// Output follows the order of `games`; a repeated appid is resolved once.
    pub fn substitute_all(
        &self,
        games: &[GameRecord],
        outcomes: &HashMap<String, LookupOutcome>,
    ) -> Vec<CandidateEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for game in games {
            if !seen.insert(game.appid.as_str()) {
                continue;
            }
            let Some(LookupOutcome::Found(templates)) = outcomes.get(&game.appid) else {
                continue;
            };

            let rules = token_rules(&self.roots, game);
            for template in templates {
                match substitute(template, &rules) {
                    Ok(path) => entries.push(CandidateEntry {
                        appid: game.appid.clone(),
                        path,
                    }),
                    Err(e) => warn!(appid = %game.appid, %template, error = %e, "skipping template"),
                }
            }
        }

        entries
    }

    /// Looks up and substitutes all titles.
    pub async fn resolve_all(&self, games: &[GameRecord]) -> Vec<CandidateEntry> {
        let outcomes = self.lookup_all(games).await;
        let failed = outcomes
            .values()
            .filter(|o| matches!(o, LookupOutcome::Failed(_)))
            .count();
        let entries = self.substitute_all(games, &outcomes);
        info!(
            titles = outcomes.len(),
            failed,
            candidates = entries.len(),
            "resolved candidate save paths"
        );
        entries
    }

    /// Resolves all titles and replaces the candidate table at `table_path`.
    pub async fn resolve_and_persist(
        &self,
        games: &[GameRecord],
        table_path: &Path,
    ) -> Result<Vec<CandidateEntry>, ResolveError> {
        let entries = self.resolve_all(games).await;
        table::write_candidates(table_path, &entries)?;
        Ok(entries)
    }
}
