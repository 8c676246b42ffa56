//! Pipeline-provided context resolved into explicit values.
//!
//! Everything the core logic needs is carried in this struct and passed by
//! value; no component reads CI state ambiently.

use anyhow::{anyhow, Result};

#[derive(Clone, Debug)]
pub struct PipelineContext {
    pub repo_owner: String,
    pub repo_name: String,
    pub git_hash: String,
    pub run_id: String,
    pub branch_name: String,
}

impl PipelineContext {
    pub fn resolve(
        repository: &str,
        git_hash: &str,
        run_id: &str,
        git_ref: &str,
        head_ref: Option<&str>,
    ) -> Result<Self> {
        let (owner, name) = repository
            .split_once('/')
            .ok_or_else(|| anyhow!("repository must be owner/name, got {repository:?}"))?;
        Ok(Self {
            repo_owner: owner.to_string(),
            repo_name: name.to_string(),
            git_hash: git_hash.to_string(),
            run_id: run_id.to_string(),
            branch_name: branch_name(git_ref, head_ref),
        })
    }

    /// Link back to the CI run that produced the report.
    pub fn run_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/actions/runs/{}",
            self.repo_owner, self.repo_name, self.run_id
        )
    }

    /// The renderer wants a numeric build order for trend navigation; a run
    /// id that is not numeric degrades to 0 rather than failing the publish.
    pub fn build_order(&self) -> u64 {
        self.run_id.parse().unwrap_or(0)
    }
}

/// Pull-request runs report under their head ref; everything else under the
/// triggering ref with the `refs/heads/` prefix stripped.
pub fn branch_name(git_ref: &str, head_ref: Option<&str>) -> String {
    let raw = match head_ref.filter(|head| !head.is_empty()) {
        Some(head) => head,
        None => git_ref.strip_prefix("refs/heads/").unwrap_or(git_ref),
    };
    normalize_branch_name(raw)
}

pub fn normalize_branch_name(branch: &str) -> String {
    branch.replace(['/', '.'], "_")
}

/// Static-pages hosts serve paths verbatim; spaces are the only characters
/// the pipeline produces that need escaping.
pub fn encode_url(url: &str) -> String {
    url.replace(' ', "%20")
}
