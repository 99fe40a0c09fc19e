//! External analyzer invocation.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use lintrelay_types::{AnalyzerConfig, AnalyzerReport};

/// Run the configured analyzer inside the workspace and parse the JSON
/// report it writes. Fail-fast: a non-zero analyzer exit or an
/// unreadable report aborts the run.
pub fn run_analyzer(workspace: &Path, analyzer: &AnalyzerConfig) -> Result<AnalyzerReport> {
    info!("running analyzer '{}'", analyzer.program);
    debug!("analyzer args: {:?}", analyzer.args);

    let status = Command::new(&analyzer.program)
        .args(&analyzer.args)
        .current_dir(workspace)
        .status()
        .with_context(|| format!("spawn analyzer '{}'", analyzer.program))?;

    if !status.success() {
        bail!("analyzer '{}' exited with {}", analyzer.program, status);
    }

    let report_path = workspace.join(&analyzer.report);
    let text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read analyzer report '{}'", report_path.display()))?;

    let report: AnalyzerReport = serde_json::from_str(&text)
        .with_context(|| format!("parse analyzer report '{}'", report_path.display()))?;

    info!(
        "analyzer reported {} file(s) with diagnostics",
        report.files.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn analyzer(program: &str, report: &str) -> AnalyzerConfig {
        AnalyzerConfig {
            program: program.to_string(),
            args: vec![],
            report: report.to_string(),
        }
    }

    #[test]
    fn reads_report_written_by_analyzer() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("output.json"),
            r#"{"files":[{"file":"a.txt","errors":[]}]}"#,
        )
        .unwrap();

        let report = run_analyzer(temp.path(), &analyzer("true", "output.json")).unwrap();
        assert_eq!(report.files.len(), 1);
    }

    #[test]
    fn failing_analyzer_aborts() {
        let temp = TempDir::new().unwrap();
        let err = run_analyzer(temp.path(), &analyzer("false", "output.json")).unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[test]
    fn missing_report_file_aborts() {
        let temp = TempDir::new().unwrap();
        let err = run_analyzer(temp.path(), &analyzer("true", "absent.json")).unwrap_err();
        assert!(err.to_string().contains("read analyzer report"));
    }

    #[test]
    fn malformed_report_aborts() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("output.json"), "not json").unwrap();

        let err = run_analyzer(temp.path(), &analyzer("true", "output.json")).unwrap_err();
        assert!(err.to_string().contains("parse analyzer report"));
    }
}
