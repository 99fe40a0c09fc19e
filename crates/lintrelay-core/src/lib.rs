//! Core engine: batches reviewed annotations into pages and renders
//! them for the two annotation consumers.

mod paginate;
mod render;
mod report;

pub use paginate::{paginate, summary_markdown};
pub use render::{CheckRunRenderer, CheckRunUpdate, LineRecordRenderer, PageRenderer};
pub use report::{ReportRun, run_report};
