//! Data types (wire shapes + config) for lintrelay.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.
//! The pipeline logic lives in `lintrelay-domain` and `lintrelay-core`.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Frozen Vocabulary ──────────────────────────────────────────
// These strings and limits are wire-compatible with the check-run
// and line-record consumers and must not drift.

/// Maximum number of annotations a single check-run update may carry.
pub const MAX_ANNOTATIONS_PER_PAGE: usize = 50;

/// Default check name when neither config nor environment supplies one.
pub const DEFAULT_CHECK_NAME: &str = "lintrelay";

/// Default file name for line records written in GitLab mode.
pub const LINE_RECORD_FILE: &str = "annotations.txt";

/// Normalized severity of one annotation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationLevel {
    Failure,
    Warning,
    Notice,
}

impl AnnotationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationLevel::Failure => "failure",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Notice => "notice",
        }
    }

    /// Single-letter severity code used in line records.
    pub fn code_letter(self) -> &'static str {
        match self {
            AnnotationLevel::Failure => "E",
            AnnotationLevel::Warning => "W",
            AnnotationLevel::Notice => "I",
        }
    }

    /// Human label prefixed to the message in line records.
    pub fn record_label(self) -> &'static str {
        match self {
            AnnotationLevel::Failure => "\u{274c} Failure: ",
            AnnotationLevel::Warning => "\u{26a0}\u{fe0f} Warning: ",
            AnnotationLevel::Notice => "\u{2139}\u{fe0f} Notice: ",
        }
    }
}

/// Overall verdict for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Neutral,
    Failure,
}

impl Conclusion {
    pub fn as_str(self) -> &'static str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Neutral => "neutral",
            Conclusion::Failure => "failure",
        }
    }
}

/// Source location of an offense as reported by the analyzer.
///
/// Columns may be absent or non-positive in real reports; consumers
/// coerce them before use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub start_line: u32,
    #[serde(default)]
    pub end_line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<i64>,
}

/// One raw diagnostic from the analyzer. Severity is free-form text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Offense {
    pub severity: String,
    pub category: String,
    pub message: String,
    #[serde(default)]
    pub position: Position,
}

/// Per-file diagnostics group in the analyzer's report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileDiagnostics {
    pub file: String,
    #[serde(default)]
    pub errors: Vec<Offense>,
}

/// The analyzer's result document: `{ "files": [ { "file", "errors" } ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzerReport {
    #[serde(default)]
    pub files: Vec<FileDiagnostics>,
}

/// A normalized, renderable finding.
///
/// Column fields are present only for single-line annotations with
/// consistent columns; otherwise the annotation spans whole lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Annotation {
    pub path: String,
    pub title: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    pub annotation_level: AnnotationLevel,
    pub message: String,
}

/// Accepted-annotation counts per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LevelCounts {
    pub failure: u32,
    pub warning: u32,
    pub notice: u32,
}

impl LevelCounts {
    pub fn bump(&mut self, level: AnnotationLevel) {
        match level {
            AnnotationLevel::Failure => self.failure = self.failure.saturating_add(1),
            AnnotationLevel::Warning => self.warning = self.warning.saturating_add(1),
            AnnotationLevel::Notice => self.notice = self.notice.saturating_add(1),
        }
    }

    pub fn total(&self) -> u32 {
        self.failure
            .saturating_add(self.warning)
            .saturating_add(self.notice)
    }
}

/// One bounded batch of annotations plus the run-wide summary.
///
/// Serializes directly as a check-run `output` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Page {
    pub title: String,
    pub summary: String,
    pub annotations: Vec<Annotation>,
}

/// Category suppressions keyed by normalized level.
///
/// A level absent from the map suppresses nothing at that level.
pub type SuppressedCategories = BTreeMap<AnnotationLevel, BTreeSet<String>>;

/// The on-disk configuration file (`lintrelay.toml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<AnalyzerConfig>,

    #[serde(default)]
    pub suppress: SuppressConfig,
}

/// How to invoke the external analyzer and where it writes its report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzerConfig {
    pub program: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Report file the analyzer writes, relative to the workspace.
    pub report: String,
}

/// Suppression lists applied before annotation construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuppressConfig {
    /// Workspace-relative paths whose offenses are dropped entirely.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub files: BTreeSet<String>,

    /// Categories dropped per normalized level.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: SuppressedCategories,
}
