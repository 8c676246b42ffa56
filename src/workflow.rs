//! Orchestrates one publish run end to end.
//!
//! Strictly sequential one-shot job: precondition checks, history seeding,
//! descriptor writes, render, record write, best-effort cleanup, output
//! publication. Any error before output publication aborts the run with no
//! partial publish.

use crate::cleanup::cleanup_outdated_reports;
use crate::cli::PublishArgs;
use crate::context::{encode_url, PipelineContext};
use crate::history::{find_previous, seed_history};
use crate::metadata::{self, ExecutorInfo, RecordBase};
use crate::outputs::set_output;
use crate::renderer;
use crate::report_id::ReportId;
use crate::results::results_ok;
use crate::util::now_epoch_ms;
use anyhow::{anyhow, Context, Result};
use std::fs;

pub fn run(args: PublishArgs) -> Result<()> {
    let run_timestamp = now_epoch_ms()?;
    let ctx = PipelineContext::resolve(
        &args.repository,
        &args.git_hash,
        &args.run_id,
        &args.git_ref,
        args.head_ref.as_deref(),
    )?;
    let report_id = ReportId::new(ctx.git_hash.clone(), ctx.run_id.clone(), run_timestamp);

    let report_type_dir = args.pages_dir.join(&ctx.repo_name).join(&args.report_type);
    let report_output_dir = report_type_dir.join(report_id.to_string());
    let report_base_url = format!("{}/{}/{}", args.pages_url, ctx.repo_name, args.report_type);
    let report_url = encode_url(&format!("{report_base_url}/{report_id}"));
    let prev_git_hash = args
        .prev_git_hash
        .clone()
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| ctx.git_hash.clone());

    tracing::info!(
        report_id = %report_id,
        branch = %ctx.branch_name,
        report_type_dir = %report_type_dir.display(),
        report_url = %report_url,
        prev_git_hash = %prev_git_hash,
        max_reports = args.max_reports,
        "publishing report generation"
    );

    if !args.pages_dir.is_dir() {
        return Err(anyhow!(
            "pages directory doesn't exist: {}",
            args.pages_dir.display()
        ));
    }
    if !results_ok(&args.results_dir) {
        return Err(anyhow!(
            "no usable test results in {}",
            args.results_dir.display()
        ));
    }

    fs::create_dir_all(&report_type_dir)
        .with_context(|| format!("create {}", report_type_dir.display()))?;

    match find_previous(&report_type_dir, &prev_git_hash)? {
        Some(previous) => {
            tracing::info!("seeding trend history from {previous}");
            seed_history(&report_type_dir, &previous, &args.results_dir)?;
        }
        None => {
            tracing::info!("no previous generation for {prev_git_hash}; starting a fresh trend");
        }
    }

    metadata::write_executor_json(
        &args.results_dir,
        &ExecutorInfo {
            report_name: args.report_type.clone(),
            report_generation_id: report_id.to_string(),
            build_order: ctx.build_order(),
            build_url: ctx.run_url(),
            report_url: report_url.clone(),
        },
    )?;
    metadata::write_environment_file(
        &args.results_dir,
        &[
            ("GitRepo".to_string(), ctx.repo_name.clone()),
            ("BranchName".to_string(), ctx.branch_name.clone()),
            ("CommitHash".to_string(), ctx.git_hash.clone()),
            ("RunId".to_string(), ctx.run_id.clone()),
            ("ReportId".to_string(), report_id.to_string()),
        ],
    )?;

    let renderer_args = match &args.renderer_args {
        Some(raw) => shell_words::split(raw).context("parse --renderer-args")?,
        None => Vec::new(),
    };
    renderer::generate(
        &args.renderer,
        &renderer_args,
        &args.results_dir,
        &report_output_dir,
    )?;

    let outcome = metadata::write_record_json(
        &report_output_dir,
        &RecordBase {
            repo_name: ctx.repo_name.clone(),
            git_hash: ctx.git_hash.clone(),
            branch_name: ctx.branch_name.clone(),
            report_generation_id: report_id.to_string(),
        },
    )?;

    // Best-effort boundary: a retention failure never invalidates the publish.
    if args.max_reports > 0 {
        if let Err(err) = cleanup_outdated_reports(&report_type_dir, args.max_reports) {
            tracing::warn!("cleanup of outdated reports failed: {err:#}");
        }
    }

    set_output("report_url", &report_url)?;
    set_output("report_history_url", &encode_url(&report_base_url))?;
    set_output("test_result", outcome.test_result.as_str())?;
    set_output("test_result_icon", outcome.test_result.icon())?;
    set_output("test_result_passed", &outcome.passed.to_string())?;
    set_output("test_result_failed", &outcome.failed.to_string())?;
    set_output("test_result_total", &outcome.total.to_string())?;
    set_output("report_generation_id", &report_id.to_string())?;
    set_output("report_path", &report_output_dir.display().to_string())?;

    eprintln!(
        "published {report_url} ({} {})",
        outcome.test_result.as_str(),
        outcome.test_result.icon()
    );
    Ok(())
}
