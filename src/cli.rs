//! CLI argument parsing for the report publish workflow.
//!
//! The CLI is intentionally thin: every pipeline-supplied value lands in one
//! explicit args struct, so the core logic never reads CI state ambiently.
//! Context values fall back to the conventional CI environment variables.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rpages",
    version,
    about = "Publish a rendered test report to a static pages tree",
    after_help = "Example:\n  rpages --results-dir allure-results --pages-dir gh-pages \\\n    --pages-url https://acme.github.io/pages --report-type e2e --max-reports 20"
)]
pub struct PublishArgs {
    /// Directory holding the raw test result files consumed by the renderer
    #[arg(long, value_name = "DIR")]
    pub results_dir: PathBuf,

    /// Checkout of the static pages branch that receives the rendered report
    #[arg(long, value_name = "DIR")]
    pub pages_dir: PathBuf,

    /// Public base URL the pages tree is served from
    #[arg(long, value_name = "URL")]
    pub pages_url: String,

    /// Report type label; each label gets its own history and retention bucket
    #[arg(long, value_name = "NAME")]
    pub report_type: String,

    /// Commit hash whose latest prior generation seeds trend history
    /// (defaults to the current commit hash)
    #[arg(long, value_name = "SHA")]
    pub prev_git_hash: Option<String>,

    /// Maximum active report generations to keep per report type (0 disables cleanup)
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub max_reports: usize,

    /// Commit hash of the run under report
    #[arg(long, value_name = "SHA", env = "GITHUB_SHA")]
    pub git_hash: String,

    /// Pipeline run identifier (stable across re-runs of the same run)
    #[arg(long, value_name = "ID", env = "GITHUB_RUN_ID")]
    pub run_id: String,

    /// Fully qualified git ref the run was triggered for
    #[arg(long, value_name = "REF", env = "GITHUB_REF")]
    pub git_ref: String,

    /// Pull request head ref, when the run was triggered by a pull request
    #[arg(long, value_name = "REF", env = "GITHUB_HEAD_REF")]
    pub head_ref: Option<String>,

    /// Repository as owner/name
    #[arg(long, value_name = "OWNER/NAME", env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Renderer executable; bare names are resolved on PATH
    #[arg(long, value_name = "BIN", default_value = "allure")]
    pub renderer: String,

    /// Extra arguments appended to the renderer's generate command
    #[arg(long, value_name = "ARGS")]
    pub renderer_args: Option<String>,
}
