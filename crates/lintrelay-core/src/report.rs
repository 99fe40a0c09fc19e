use lintrelay_domain::{ReportPlan, Review, review_report};
use lintrelay_types::{AnalyzerReport, Page};

use crate::paginate::paginate;

/// Everything one run derives from an analyzer report: the reviewed
/// annotations with counts and conclusion, and the batched pages ready
/// for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRun {
    pub review: Review,
    pub pages: Vec<Page>,
}

/// Run the pure pipeline: review the report, then batch the accepted
/// annotations. Rendering and delivery stay with the caller.
pub fn run_report(report: &AnalyzerReport, plan: &ReportPlan) -> ReportRun {
    let review = review_report(report, plan);
    let pages = paginate(&review.annotations, &plan.check_name, &review.counts);
    ReportRun { review, pages }
}
