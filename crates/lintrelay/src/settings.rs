//! Run settings assembled from the CI environment and config file.
//!
//! The original integration read ambient globals all over the place;
//! here everything is resolved once into an immutable `Settings` value.
//! Environment access goes through an explicit map so tests never touch
//! process state.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use lintrelay_domain::ReportPlan;
use lintrelay_types::{AnalyzerConfig, ConfigFile, DEFAULT_CHECK_NAME, SuppressedCategories};

// Identity/workspace variables provided by the CI wrapper.
pub const ENV_CI_ENV: &str = "LINTRELAY_CI_ENV";
pub const ENV_TOKEN: &str = "LINTRELAY_TOKEN";
pub const ENV_WORKSPACE: &str = "LINTRELAY_WORKSPACE";
pub const ENV_SHA: &str = "LINTRELAY_SHA";
pub const ENV_CHECK_NAME: &str = "LINTRELAY_CHECK_NAME";
pub const ENV_EVENT_PATH: &str = "LINTRELAY_EVENT_PATH";

// Action-style inputs carrying JSON payloads.
pub const INPUT_SUPPRESSED_FILES: &str = "INPUT_SUPPRESSEDFILES";
pub const INPUT_SUPPRESSED_CATEGORIES: &str = "INPUT_SUPPRESSEDCATEGORIES";
pub const INPUT_CHANGED_FILES_ONLY: &str = "INPUT_CHANGEDFILESONLY";

/// Which CI surface the run reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiEnv {
    Github,
    Gitlab,
}

/// Immutable configuration for one `ci` run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub ci_env: CiEnv,
    pub token: Option<String>,
    pub workspace: String,
    pub sha: String,
    pub check_name: String,
    pub event_path: Option<String>,
    pub changed_only: bool,
    pub suppressed_files: BTreeSet<String>,
    pub suppressed_categories: SuppressedCategories,
    pub analyzer: AnalyzerConfig,
}

impl Settings {
    /// Resolve settings from an environment snapshot overlaying the
    /// config file. Malformed inputs are configuration errors and abort
    /// before any collaborator runs.
    pub fn resolve(env: &BTreeMap<String, String>, config: &ConfigFile) -> Result<Self> {
        let ci_env = match env.get(ENV_CI_ENV).map(String::as_str) {
            Some("github") => CiEnv::Github,
            Some("gitlab") => CiEnv::Gitlab,
            Some(other) => bail!("unsupported {ENV_CI_ENV} value '{other}'"),
            None => bail!("{ENV_CI_ENV} must be set to 'github' or 'gitlab'"),
        };

        let raw_changed_only = env
            .get(INPUT_CHANGED_FILES_ONLY)
            .map(String::as_str)
            .unwrap_or("");
        let changed_only = match ci_env {
            // Any value except "0" or empty enables change scoping.
            CiEnv::Github => !(raw_changed_only == "0" || raw_changed_only.is_empty()),
            // Line-record consumers see every annotation.
            CiEnv::Gitlab => false,
        };

        let mut suppressed_files = config.suppress.files.clone();
        if let Some(raw) = env.get(INPUT_SUPPRESSED_FILES) {
            let parsed: Vec<String> = serde_json::from_str(raw)
                .with_context(|| format!("parse {INPUT_SUPPRESSED_FILES} as a JSON array"))?;
            suppressed_files.extend(parsed);
        }

        let mut suppressed_categories = config.suppress.categories.clone();
        if let Some(raw) = env.get(INPUT_SUPPRESSED_CATEGORIES) {
            let parsed: SuppressedCategories = serde_json::from_str(raw).with_context(|| {
                format!("parse {INPUT_SUPPRESSED_CATEGORIES} as a level-keyed JSON object")
            })?;
            for (level, categories) in parsed {
                suppressed_categories
                    .entry(level)
                    .or_default()
                    .extend(categories);
            }
        }

        let analyzer = config
            .analyzer
            .clone()
            .context("config must define an [analyzer] section for ci runs")?;

        let check_name = env
            .get(ENV_CHECK_NAME)
            .cloned()
            .or_else(|| config.check_name.clone())
            .unwrap_or_else(|| DEFAULT_CHECK_NAME.to_string());

        Ok(Settings {
            ci_env,
            token: env.get(ENV_TOKEN).cloned().filter(|t| !t.is_empty()),
            workspace: env.get(ENV_WORKSPACE).cloned().unwrap_or_else(|| ".".to_string()),
            sha: env.get(ENV_SHA).cloned().unwrap_or_default(),
            check_name,
            event_path: env.get(ENV_EVENT_PATH).cloned(),
            changed_only,
            suppressed_files,
            suppressed_categories,
            analyzer,
        })
    }

    /// Build the per-run pipeline plan with the supplied change set.
    pub fn plan_with(&self, changed_files: BTreeSet<String>) -> ReportPlan {
        ReportPlan {
            check_name: self.check_name.clone(),
            workspace_root: self.workspace.clone(),
            suppressed_files: self.suppressed_files.clone(),
            suppressed_categories: self.suppressed_categories.clone(),
            changed_only: self.changed_only,
            changed_files,
        }
    }
}

/// The slice of a GitHub event payload this tool consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub repository: Option<Repository>,
    pub pull_request: Option<PullRequest>,
    pub before: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub base: GitRef,
    pub head: GitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: Option<String>,
}
