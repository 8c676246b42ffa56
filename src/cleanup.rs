//! Retention engine for historical report generations.
//!
//! Bounds the number of active generations kept per report type while always
//! retaining the most recent render of each of the `max_active`
//! most-recently-active distinct commits. Pruning removes a generation's bulk
//! content but keeps the durable record artifact and leaves a redirect stub
//! in its place.

use crate::metadata::RECORD_FILE;
use crate::report_id::ReportId;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A pruned generation holds at most the record artifact and the redirect
/// stub. Anything with more direct entries is a full render. Keep this
/// heuristic behind this one predicate; swapping it for an explicit marker
/// file must not touch the retention algorithm.
const PRUNED_MAX_ENTRIES: usize = 2;

const REDIRECT_STUB_FILE: &str = "index.html";
const REDIRECT_STUB: &str =
    "<head><meta http-equiv='refresh' content='0; URL=./record.json'></head>\n";

/// Prunes every active generation not covered by the retention policy.
/// Per-directory prune failures are logged and do not abort the pass; the
/// orchestrator additionally discards this function's own result, so a
/// failed cleanup can never fail a successful publish.
pub fn cleanup_outdated_reports(report_type_dir: &Path, max_active: usize) -> Result<()> {
    let entries = fs::read_dir(report_type_dir)
        .with_context(|| format!("list {}", report_type_dir.display()))?;
    let mut active = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() || !is_active_report(&path)? {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        match name.parse::<ReportId>() {
            Ok(id) => active.push(id),
            Err(err) => {
                tracing::warn!("skipping unrecognized report directory {name}: {err}");
            }
        }
    }
    for id in reports_to_prune(&active, max_active) {
        let dir = report_type_dir.join(id.to_string());
        if let Err(err) = prune_report(&dir) {
            tracing::warn!("pruning {} failed: {err:#}", dir.display());
        }
    }
    Ok(())
}

/// Already-pruned generations are skipped, which makes cleanup idempotent.
fn is_active_report(report_dir: &Path) -> Result<bool> {
    let count = fs::read_dir(report_dir)
        .with_context(|| format!("list {}", report_dir.display()))?
        .count();
    Ok(count > PRUNED_MAX_ENTRIES)
}

/// Pure retention decision: walk the active set most-recent-first, keeping
/// the first generation seen for each commit hash until `max_active` distinct
/// hashes are covered. Everything else is pruned.
fn reports_to_prune(active: &[ReportId], max_active: usize) -> Vec<ReportId> {
    let mut sorted: Vec<ReportId> = active.to_vec();
    sorted.sort_by(|a, b| b.run_timestamp.cmp(&a.run_timestamp));

    let mut kept_hashes: HashSet<String> = HashSet::new();
    let mut keep: HashSet<String> = HashSet::new();
    for id in &sorted {
        if kept_hashes.insert(id.git_hash.clone()) {
            keep.insert(id.to_string());
            if keep.len() >= max_active {
                break;
            }
        }
    }
    sorted
        .into_iter()
        .filter(|id| !keep.contains(&id.to_string()))
        .collect()
}

/// Deletes every subdirectory and every file except the record artifact,
/// then writes the redirect stub pointing a viewer at the record. Without a
/// record the directory is merely emptied; there is nothing to redirect to.
fn prune_report(report_dir: &Path) -> Result<()> {
    tracing::info!("pruning report {}", report_dir.display());
    let entries =
        fs::read_dir(report_dir).with_context(|| format!("list {}", report_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            fs::remove_dir_all(&path).with_context(|| format!("remove {}", path.display()))?;
        } else if entry.file_name() != RECORD_FILE {
            fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
        }
    }
    if report_dir.join(RECORD_FILE).is_file() {
        let stub_path = report_dir.join(REDIRECT_STUB_FILE);
        fs::write(&stub_path, REDIRECT_STUB)
            .with_context(|| format!("write {}", stub_path.display()))?;
    }
    Ok(())
}
