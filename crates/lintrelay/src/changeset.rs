//! Changed-file discovery via git.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Where the diff for this run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    PullRequest { base_ref: String, head_ref: String },
    Push { before: String, head: String },
}

/// Collect the set of changed repository-relative paths.
///
/// Pull requests compare the remote base and head branches; pushes
/// compare the pre-push commit against the head SHA. An empty set is a
/// valid result. A failing git invocation aborts the run.
pub fn changed_files(workspace: &Path, source: &DiffSource) -> Result<BTreeSet<String>> {
    let args: Vec<String> = match source {
        DiffSource::PullRequest { base_ref, head_ref } => vec![
            "log".to_string(),
            "--name-only".to_string(),
            "--pretty=".to_string(),
            format!("origin/{base_ref}..origin/{head_ref}"),
        ],
        DiffSource::Push { before, head } => vec![
            "diff".to_string(),
            "--name-only".to_string(),
            before.clone(),
            head.clone(),
        ],
    };

    debug!("resolving change set: git {}", args.join(" "));
    let output = Command::new("git")
        .args(&args)
        .current_dir(workspace)
        .output()
        .context("spawn git")?;

    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let files: BTreeSet<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    debug!("change set has {} file(s)", files.len());
    Ok(files)
}
