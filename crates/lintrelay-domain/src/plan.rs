use std::collections::BTreeSet;

use lintrelay_types::SuppressedCategories;

/// Immutable per-run configuration threaded through the pipeline.
///
/// One value per run; nothing here is ambient process state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPlan {
    /// Constant check name, also used as every annotation's title.
    pub check_name: String,
    /// Absolute workspace root stripped from analyzer paths.
    pub workspace_root: String,
    /// Workspace-relative paths whose offenses are dropped.
    pub suppressed_files: BTreeSet<String>,
    /// Categories dropped per normalized level.
    pub suppressed_categories: SuppressedCategories,
    /// When true, only offenses in `changed_files` survive.
    pub changed_only: bool,
    /// Externally computed change set; empty is valid and meaningful.
    pub changed_files: BTreeSet<String>,
}

/// Normalize an analyzer-reported path to a workspace-relative one.
///
/// Strips surrounding whitespace and the workspace-root prefix. Paths
/// outside the workspace are returned trimmed but otherwise untouched.
pub fn normalize_path(raw: &str, workspace_root: &str) -> String {
    let trimmed = raw.trim();
    if workspace_root.is_empty() {
        return trimmed.to_string();
    }
    let prefix = format!("{}/", workspace_root.trim_end_matches('/'));
    match trimmed.strip_prefix(prefix.as_str()) {
        Some(rest) => rest.to_string(),
        None => trimmed.to_string(),
    }
}
