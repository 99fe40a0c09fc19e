use lintrelay_types::{AnalyzerReport, Annotation, AnnotationLevel, Conclusion, LevelCounts, Offense};

use crate::plan::{ReportPlan, normalize_path};
use crate::severity::level_for_severity;

/// Outcome of one pass over an analyzer report: the accepted
/// annotations in input order, their per-level counts, and the verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub annotations: Vec<Annotation>,
    pub counts: LevelCounts,
    pub conclusion: Conclusion,
}

/// Filter, classify, count and build in a single pass.
///
/// Counts and conclusion reflect accepted offenses only; suppressed or
/// out-of-scope offenses contribute to neither. Input order is
/// preserved, which fixes the later page ordering.
pub fn review_report(report: &AnalyzerReport, plan: &ReportPlan) -> Review {
    let mut annotations: Vec<Annotation> = Vec::new();
    let mut counts = LevelCounts::default();
    let mut conclusion = Conclusion::Success;

    for file in &report.files {
        let path = normalize_path(&file.file, &plan.workspace_root);
        if plan.suppressed_files.contains(&path) {
            continue;
        }
        if plan.changed_only && !plan.changed_files.contains(&path) {
            continue;
        }

        for offense in &file.errors {
            let level = level_for_severity(&offense.severity);
            if let Some(categories) = plan.suppressed_categories.get(&level) {
                if categories.contains(&offense.category) {
                    continue;
                }
            }

            raise_conclusion(&mut conclusion, level);
            counts.bump(level);
            annotations.push(build_annotation(&path, offense, level, &plan.check_name));
        }
    }

    Review {
        annotations,
        counts,
        conclusion,
    }
}

/// Monotonic verdict upgrade: a failure is permanent, a warning lifts
/// `success` to `neutral` and nothing else.
fn raise_conclusion(conclusion: &mut Conclusion, level: AnnotationLevel) {
    match level {
        AnnotationLevel::Failure => *conclusion = Conclusion::Failure,
        AnnotationLevel::Warning => {
            if *conclusion == Conclusion::Success {
                *conclusion = Conclusion::Neutral;
            }
        }
        AnnotationLevel::Notice => {}
    }
}

/// Convert one accepted offense into an annotation.
///
/// Total over malformed position data: columns are emitted only when
/// the offense sits on a single line with consistent columns (after
/// coercing missing or non-positive columns to 1); anything else
/// degrades to the whole-line form.
pub fn build_annotation(
    path: &str,
    offense: &Offense,
    level: AnnotationLevel,
    check_name: &str,
) -> Annotation {
    let message = format!("{}: {}", offense.category, offense.message);
    let pos = &offense.position;

    let start_column = clamp_column(pos.start_column);
    let end_column = clamp_column(pos.end_column);
    let column_precise = pos.start_line == pos.end_line && start_column <= end_column;

    Annotation {
        path: path.to_string(),
        title: check_name.to_string(),
        start_line: pos.start_line,
        end_line: pos.end_line,
        start_column: column_precise.then_some(start_column),
        end_column: column_precise.then_some(end_column),
        annotation_level: level,
        message,
    }
}

/// Coerce an absent or non-positive column to 1.
fn clamp_column(column: Option<i64>) -> u32 {
    match column {
        Some(c) if c > 0 => u32::try_from(c).unwrap_or(u32::MAX),
        _ => 1,
    }
}
