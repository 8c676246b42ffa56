//! Trend-history continuity across report generations.
//!
//! Re-running the pipeline for a commit should resume the trend from the most
//! recent prior render of that same commit, not from an unrelated commit and
//! not from an older render. The linker finds that prior generation; seeding
//! copies its `history/` subtree into the new results source directory so the
//! renderer folds the prior trend points into the new render.

use crate::report_id::ReportId;
use crate::util::copy_dir_recursive;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Subtree the renderer writes trend data to inside each generation.
pub const HISTORY_DIR: &str = "history";

/// Finds the most recent prior generation under `report_type_dir` whose
/// commit hash equals `git_hash`. A missing base directory means no history.
/// Directory names that do not decode as identifiers are skipped and logged.
pub fn find_previous(report_type_dir: &Path, git_hash: &str) -> Result<Option<ReportId>> {
    if !report_type_dir.is_dir() {
        return Ok(None);
    }
    let mut latest: Option<ReportId> = None;
    let entries = fs::read_dir(report_type_dir)
        .with_context(|| format!("list {}", report_type_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let id = match name.parse::<ReportId>() {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!("skipping unrecognized report directory {name}: {err}");
                continue;
            }
        };
        if id.git_hash != git_hash {
            continue;
        }
        let newer = match &latest {
            None => true,
            Some(prev) => id.run_timestamp > prev.run_timestamp,
        };
        if newer {
            latest = Some(id);
        }
    }
    Ok(latest)
}

/// Copies the previous generation's `history/` subtree into `results_dir`.
/// A previous generation without history is tolerated; the renderer then
/// starts a fresh trend.
pub fn seed_history(
    report_type_dir: &Path,
    previous: &ReportId,
    results_dir: &Path,
) -> Result<()> {
    let prev_history = report_type_dir.join(previous.to_string()).join(HISTORY_DIR);
    if !prev_history.is_dir() {
        tracing::debug!("previous generation {previous} has no history subtree");
        return Ok(());
    }
    copy_dir_recursive(&prev_history, &results_dir.join(HISTORY_DIR))
}
