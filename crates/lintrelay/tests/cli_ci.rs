use assert_cmd::Command;
use assert_cmd::cargo;
use tempfile::TempDir;

fn lintrelay() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("lintrelay"));
    // Shield the tests from ambient CI configuration.
    for var in [
        "LINTRELAY_CI_ENV",
        "LINTRELAY_TOKEN",
        "LINTRELAY_WORKSPACE",
        "LINTRELAY_SHA",
        "LINTRELAY_CHECK_NAME",
        "LINTRELAY_EVENT_PATH",
        "INPUT_SUPPRESSEDFILES",
        "INPUT_SUPPRESSEDCATEGORIES",
        "INPUT_CHANGEDFILESONLY",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("lintrelay.toml");
    std::fs::write(
        &path,
        r#"
[analyzer]
program = "true"
report = "output.json"
"#,
    )
    .expect("write config fixture");
    path
}

#[test]
fn ci_requires_a_ci_environment() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    lintrelay()
        .arg("ci")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}

#[test]
fn ci_rejects_unknown_ci_environment() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    lintrelay()
        .arg("ci")
        .arg("--config")
        .arg(&config)
        .env("LINTRELAY_CI_ENV", "circle")
        .assert()
        .failure();
}

#[test]
fn github_mode_without_token_aborts_before_any_collaborator() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let output = lintrelay()
        .arg("ci")
        .arg("--config")
        .arg(&config)
        .env("LINTRELAY_CI_ENV", "github")
        .env("LINTRELAY_WORKSPACE", temp.path())
        .env("LINTRELAY_SHA", "abc123")
        .output()
        .expect("run lintrelay");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LINTRELAY_TOKEN"), "stderr: {stderr}");
}

#[test]
fn gitlab_mode_writes_line_records_into_workspace() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    std::fs::write(
        temp.path().join("output.json"),
        r#"{
            "files": [
                {
                    "file": "a.txt",
                    "errors": [
                        {
                            "severity": "Error",
                            "category": "Syntax",
                            "message": "bad token",
                            "position": {
                                "startLine": 3,
                                "endLine": 3,
                                "startColumn": 2,
                                "endColumn": 5
                            }
                        },
                        {
                            "severity": "hint",
                            "category": "Doc",
                            "message": "missing",
                            "position": { "startLine": 1, "endLine": 4 }
                        }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    lintrelay()
        .arg("ci")
        .arg("--config")
        .arg(&config)
        .env("LINTRELAY_CI_ENV", "gitlab")
        .env("LINTRELAY_WORKSPACE", temp.path())
        .assert()
        .success();

    let records = std::fs::read_to_string(temp.path().join("annotations.txt")).unwrap();
    assert_eq!(
        records,
        "a.txt:3:2:E:\u{274c} Failure: Syntax: bad token\n\
         a.txt:1:1:I:\u{2139}\u{fe0f} Notice: Doc: missing\n"
    );
}

#[test]
fn gitlab_mode_with_clean_report_writes_empty_file() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    std::fs::write(temp.path().join("output.json"), r#"{"files":[]}"#).unwrap();

    lintrelay()
        .arg("ci")
        .arg("--config")
        .arg(&config)
        .env("LINTRELAY_CI_ENV", "gitlab")
        .env("LINTRELAY_WORKSPACE", temp.path())
        .assert()
        .success();

    let records = std::fs::read_to_string(temp.path().join("annotations.txt")).unwrap();
    assert!(records.is_empty());
}

#[test]
fn gitlab_mode_fails_when_analyzer_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("lintrelay.toml");
    std::fs::write(
        &config,
        r#"
[analyzer]
program = "false"
report = "output.json"
"#,
    )
    .unwrap();

    lintrelay()
        .arg("ci")
        .arg("--config")
        .arg(&config)
        .env("LINTRELAY_CI_ENV", "gitlab")
        .env("LINTRELAY_WORKSPACE", temp.path())
        .assert()
        .failure();
}
