use lintrelay_types::AnnotationLevel;

/// Map a raw analyzer severity onto a normalized level.
///
/// The lookup is case-insensitive; anything unrecognized (including an
/// empty string) is a notice. This function never fails.
pub fn level_for_severity(severity: &str) -> AnnotationLevel {
    match severity.to_ascii_lowercase().as_str() {
        "error" => AnnotationLevel::Failure,
        "warning" => AnnotationLevel::Warning,
        "information" | "hint" => AnnotationLevel::Notice,
        _ => AnnotationLevel::Notice,
    }
}
