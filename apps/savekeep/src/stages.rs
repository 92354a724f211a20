//! The four pipeline stages and the runner that chains them.
//!
//! Stages communicate only through the candidate and resolved tables, so
//! each one can be run on its own.

use anyhow::{Context, Result, bail};
use savekeep_backup::BackupReport;
use savekeep_resolve::{CandidateEntry, Config, Pipeline, VerifiedEntry, table};
use savekeep_steam::{GameRecord, Paths, StoreClient};
use tracing::{error, info, warn};

const STAGE_COUNT: usize = 4;

/// Scans the Steam libraries and writes the candidate table.
pub async fn discover(config: &Config) -> Result<Vec<CandidateEntry>> {
    let games = installed_games(config)?;
    info!(count = games.len(), "discovered installed titles");

    let client = savekeep_pcgw::Client::new(config.lookup_timeout)?;
    let pipeline = Pipeline::new(client, config.roots())
        .with_limits(config.lookup_concurrency, config.lookup_timeout);

    let candidates = pipeline
        .resolve_and_persist(&games, &config.candidate_table)
        .await?;
    info!(
        count = candidates.len(),
        table = %config.candidate_table.display(),
        "wrote candidate table"
    );
    Ok(candidates)
}

/// Checks candidates on disk and writes the resolved table.
pub fn verify(config: &Config) -> Result<Vec<VerifiedEntry>> {
    let candidates = table::read_candidates(&config.candidate_table)?;
    let identities = identities(config);

    let verified =
        savekeep_resolve::verify_and_persist(&candidates, &identities, &config.resolved_table)?;
    info!(
        count = verified.len(),
        table = %config.resolved_table.display(),
        "wrote resolved table"
    );
    Ok(verified)
}

/// Copies every verified save directory into the backup directory.
pub fn backup(config: &Config) -> Result<BackupReport> {
    let root = config.backup_dir()?;
    let entries = table::read_resolved(&config.resolved_table)?;
    Ok(savekeep_backup::backup_all(&entries, root))
}

/// Writes the store names of the verified titles next to the backups.
pub async fn names(config: &Config) -> Result<usize> {
    let dir = config.backup_dir()?;
    let entries = table::read_resolved(&config.resolved_table)?;

    let client = StoreClient::new(config.lookup_timeout)?;
    let names = savekeep_backup::fetch_names(&client, &entries, config.lookup_concurrency).await;
    let path = savekeep_backup::write_names(dir, &names)?;
    info!(count = names.len(), path = %path.display(), "wrote title names");
    Ok(names.len())
}

/// Runs every stage in order. A failing stage does not stop the later
/// ones; the run fails if any stage did.
pub async fn run_all(config: &Config) -> Result<()> {
    let results = [
        ("discover", discover(config).await.map(|_| ())),
        ("verify", verify(config).map(|_| ())),
        ("backup", backup(config).map(|_| ())),
        ("names", names(config).await.map(|_| ())),
    ];

    let mut failed = 0;
    for (stage, result) in &results {
        if let Err(e) = result {
            error!(stage, error = %format!("{e:#}"), "stage failed");
            failed += 1;
        }
    }

    info!("Successful stages: {}/{STAGE_COUNT}", STAGE_COUNT - failed);
    info!("Failed stages: {failed}/{STAGE_COUNT}");
    if failed > 0 {
        bail!("{failed} of {STAGE_COUNT} stages failed");
    }
    Ok(())
}

fn installed_games(config: &Config) -> Result<Vec<GameRecord>> {
    let paths = Paths::with_base(&config.steam_root);
    savekeep_steam::discover(&paths)
        .with_context(|| format!("failed to scan Steam libraries under {}", config.steam_root))
}

/// Configured identities, or the local Steam users when none are set.
fn identities(config: &Config) -> Vec<String> {
    if !config.identities.is_empty() {
        return config.identities.clone();
    }
    match savekeep_steam::user_ids(&Paths::with_base(&config.steam_root)) {
        Ok(ids) => {
            info!(count = ids.len(), "using local Steam users as identities");
            ids
        }
        Err(e) => {
            warn!(error = %e, "no identities configured and no Steam users found");
            Vec::new()
        }
    }
}
