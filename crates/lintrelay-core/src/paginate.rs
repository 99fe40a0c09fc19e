use lintrelay_types::{Annotation, LevelCounts, MAX_ANNOTATIONS_PER_PAGE, Page};

/// Run-wide summary rendered from the final counts.
///
/// The template is wire-frozen; every page of a run carries the same
/// text.
pub fn summary_markdown(counts: &LevelCounts) -> String {
    format!(
        "**{total}** offense(s) found:\n* {failure} failure(s)\n* {warning} warning(s)\n* {notice} notice(s)",
        total = counts.total(),
        failure = counts.failure,
        warning = counts.warning,
        notice = counts.notice,
    )
}

/// Split annotations into contiguous pages of at most
/// [`MAX_ANNOTATIONS_PER_PAGE`], preserving order.
///
/// The summary is computed once from the final counts and repeated on
/// every page. No annotations means no pages at all; callers treat
/// "nothing to send" as distinct from "a report with zero findings".
pub fn paginate(annotations: &[Annotation], check_name: &str, counts: &LevelCounts) -> Vec<Page> {
    let summary = summary_markdown(counts);
    annotations
        .chunks(MAX_ANNOTATIONS_PER_PAGE)
        .map(|chunk| Page {
            title: check_name.to_string(),
            summary: summary.clone(),
            annotations: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintrelay_types::AnnotationLevel;

    fn notice_annotation(line: u32) -> Annotation {
        Annotation {
            path: "a.txt".to_string(),
            title: "lintrelay".to_string(),
            start_line: line,
            end_line: line,
            start_column: Some(1),
            end_column: Some(1),
            annotation_level: AnnotationLevel::Notice,
            message: "Doc: m".to_string(),
        }
    }

    #[test]
    fn summary_template_is_exact() {
        let counts = LevelCounts {
            failure: 1,
            warning: 2,
            notice: 3,
        };
        assert_eq!(
            summary_markdown(&counts),
            "**6** offense(s) found:\n* 1 failure(s)\n* 2 warning(s)\n* 3 notice(s)"
        );
    }

    #[test]
    fn no_annotations_means_no_pages() {
        let pages = paginate(&[], "lintrelay", &LevelCounts::default());
        assert!(pages.is_empty());
    }

    #[test]
    fn splits_into_bounded_pages_sharing_one_summary() {
        let annotations: Vec<Annotation> = (0..120).map(notice_annotation).collect();
        let counts = LevelCounts {
            failure: 0,
            warning: 0,
            notice: 120,
        };

        let pages = paginate(&annotations, "lintrelay", &counts);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].annotations.len(), 50);
        assert_eq!(pages[1].annotations.len(), 50);
        assert_eq!(pages[2].annotations.len(), 20);
        assert!(pages.iter().all(|p| p.summary == pages[0].summary));
        assert!(pages.iter().all(|p| p.title == "lintrelay"));
    }

    #[test]
    fn concatenated_pages_reconstruct_input_order() {
        let annotations: Vec<Annotation> = (0..73).map(notice_annotation).collect();
        let counts = LevelCounts {
            notice: 73,
            ..LevelCounts::default()
        };

        let pages = paginate(&annotations, "lintrelay", &counts);
        let rejoined: Vec<Annotation> = pages
            .into_iter()
            .flat_map(|p| p.annotations)
            .collect();

        assert_eq!(rejoined, annotations);
    }
}
