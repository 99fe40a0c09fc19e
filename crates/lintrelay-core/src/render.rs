//! Output renderers for batched pages.
//!
//! The two annotation consumers share one capability interface; the
//! choice between them happens once, at the orchestration boundary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lintrelay_types::{Annotation, Page};

/// Capability interface over batched pages.
pub trait PageRenderer {
    type Output;

    fn render(&self, pages: &[Page]) -> Self::Output;
}

/// One intermediate check-run update: the page wrapped in the API's
/// `output` envelope. The publisher supplies run identity and the
/// terminal conclusion payload separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckRunUpdate {
    pub output: Page,
}

/// Renders pages as structured check-run update payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckRunRenderer;

impl PageRenderer for CheckRunRenderer {
    type Output = Vec<CheckRunUpdate>;

    fn render(&self, pages: &[Page]) -> Self::Output {
        pages
            .iter()
            .map(|page| CheckRunUpdate {
                output: page.clone(),
            })
            .collect()
    }
}

/// Renders one text record per annotation for line-based consumers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRecordRenderer;

impl PageRenderer for LineRecordRenderer {
    type Output = Vec<String>;

    fn render(&self, pages: &[Page]) -> Self::Output {
        pages
            .iter()
            .flat_map(|page| page.annotations.iter().map(line_record))
            .collect()
    }
}

/// `{path}:{start_line}:{col}:{code}:{label}{message}`, column
/// defaulting to 1 for whole-line annotations.
fn line_record(annotation: &Annotation) -> String {
    let column = annotation.start_column.unwrap_or(1);
    format!(
        "{path}:{line}:{column}:{code}:{label}{message}",
        path = annotation.path,
        line = annotation.start_line,
        code = annotation.annotation_level.code_letter(),
        label = annotation.annotation_level.record_label(),
        message = annotation.message,
    )
}
