use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use lintrelay_core::{
    CheckRunRenderer, LineRecordRenderer, PageRenderer, ReportRun, run_report,
};
use lintrelay_domain::ReportPlan;
use lintrelay_types::{AnalyzerReport, Conclusion, DEFAULT_CHECK_NAME, LINE_RECORD_FILE};

mod analyzer;
mod changeset;
mod config;
mod publish;
mod settings;

use analyzer::run_analyzer;
use changeset::{DiffSource, changed_files};
use config::load_config;
use publish::{CheckRunId, CheckRunPublisher, GithubChecks, PublishError};
use settings::{CiEnv, ENV_TOKEN, Event, Settings};

#[derive(Parser)]
#[command(name = "lintrelay")]
#[command(about = "Relay static-analysis diagnostics to CI annotations", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline against the CI environment.
    Ci(CiArgs),

    /// Render an existing analyzer report without contacting any CI
    /// service.
    Report(ReportArgs),
}

#[derive(Parser, Debug)]
struct CiArgs {
    /// Path to a config file. If omitted, uses ./lintrelay.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ReportArgs {
    /// Path to the analyzer's JSON report file.
    #[arg(long)]
    report: PathBuf,

    /// Path to a config file. If omitted, uses ./lintrelay.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Lines)]
    format: ReportFormat,

    /// Output path for the rendered report.
    ///
    /// If omitted, writes to stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Workspace root prefix to strip from report paths.
    #[arg(long)]
    workspace: Option<String>,

    /// Check name used as every annotation's title.
    #[arg(long)]
    check_name: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportFormat {
    /// One text record per annotation.
    Lines,
    /// Check-run update payloads as pretty JSON.
    CheckJson,
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Ci(args) => cmd_ci(args),
        Commands::Report(args) => {
            cmd_report(args)?;
            Ok(0)
        }
    }
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn cmd_ci(args: CiArgs) -> Result<i32> {
    let config = load_config(args.config)?;
    let env = std::env::vars().collect();
    let settings = Settings::resolve(&env, &config)?;

    match settings.ci_env {
        CiEnv::Github => run_github(&settings),
        CiEnv::Gitlab => run_gitlab(&settings),
    }
}

fn run_github(settings: &Settings) -> Result<i32> {
    let Some(token) = settings.token.clone() else {
        bail!("{ENV_TOKEN} must be set for github mode");
    };

    let event_path = settings
        .event_path
        .as_deref()
        .context("event payload path must be set for github mode")?;
    let text = std::fs::read_to_string(event_path)
        .with_context(|| format!("read event payload '{event_path}'"))?;
    let event: Event = serde_json::from_str(&text)
        .with_context(|| format!("parse event payload '{event_path}'"))?;
    let repository = event
        .repository
        .as_ref()
        .context("event payload has no repository")?;

    let (head_sha, diff_source) = resolve_diff_source(&event, &settings.sha)?;
    match diff_source {
        DiffSource::PullRequest { .. } => info!("pull request run"),
        DiffSource::Push { .. } => info!("commit run"),
    }
    if settings.changed_only {
        info!("annotating only changed files");
    } else {
        info!("annotating all files");
    }

    let publisher = GithubChecks::new(
        token,
        repository.owner.login.clone(),
        repository.name.clone(),
        settings.check_name.clone(),
        head_sha,
    )?;
    let check_id = publisher.create()?;

    match execute_check(settings, &publisher, check_id, &diff_source) {
        Ok(()) => Ok(0),
        Err(err) => {
            // Best effort: the verdict surface should show the broken
            // run even when the pipeline died half-way.
            if let Err(conclude_err) = publisher.conclude(check_id, Conclusion::Failure) {
                warn!("could not report failure conclusion: {conclude_err}");
            }
            Err(err)
        }
    }
}

fn resolve_diff_source(event: &Event, ambient_sha: &str) -> Result<(String, DiffSource)> {
    match &event.pull_request {
        Some(pr) => {
            let head_sha = pr
                .head
                .sha
                .clone()
                .unwrap_or_else(|| ambient_sha.to_string());
            Ok((
                head_sha,
                DiffSource::PullRequest {
                    base_ref: pr.base.git_ref.clone(),
                    head_ref: pr.head.git_ref.clone(),
                },
            ))
        }
        None => {
            let before = event
                .before
                .clone()
                .context("push event payload has no 'before' commit")?;
            Ok((
                ambient_sha.to_string(),
                DiffSource::Push {
                    before,
                    head: ambient_sha.to_string(),
                },
            ))
        }
    }
}

/// Everything after check creation: change set, analyzer, pipeline,
/// delivery. Errors here trigger the caller's best-effort failure
/// conclusion.
fn execute_check(
    settings: &Settings,
    publisher: &dyn CheckRunPublisher,
    check_id: CheckRunId,
    diff_source: &DiffSource,
) -> Result<()> {
    let workspace = Path::new(&settings.workspace);

    let changed = if settings.changed_only {
        changed_files(workspace, diff_source)?
    } else {
        BTreeSet::new()
    };

    let report = run_analyzer(workspace, &settings.analyzer)?;
    let run = run_report(&report, &settings.plan_with(changed));
    info!(
        "{} annotation(s) across {} page(s), conclusion {}",
        run.review.counts.total(),
        run.pages.len(),
        run.review.conclusion.as_str()
    );

    deliver_check(publisher, check_id, &run)?;
    Ok(())
}

/// Publish every page in order, then the terminal conclusion.
fn deliver_check(
    publisher: &dyn CheckRunPublisher,
    check_id: CheckRunId,
    run: &ReportRun,
) -> Result<(), PublishError> {
    for update in CheckRunRenderer.render(&run.pages) {
        publisher.update(check_id, &update)?;
    }
    publisher.conclude(check_id, run.review.conclusion)
}

fn run_gitlab(settings: &Settings) -> Result<i32> {
    let workspace = Path::new(&settings.workspace);

    let report = run_analyzer(workspace, &settings.analyzer)?;
    let run = run_report(&report, &settings.plan_with(BTreeSet::new()));

    let records = LineRecordRenderer.render(&run.pages);
    let mut text = records.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }

    let path = workspace.join(LINE_RECORD_FILE);
    std::fs::write(&path, text)
        .with_context(|| format!("write line records '{}'", path.display()))?;

    info!(
        "wrote {} line record(s) to '{}', conclusion {}",
        records.len(),
        path.display(),
        run.review.conclusion.as_str()
    );
    Ok(0)
}

fn cmd_report(args: ReportArgs) -> Result<()> {
    let config = load_config(args.config)?;

    let text = std::fs::read_to_string(&args.report)
        .with_context(|| format!("read analyzer report '{}'", args.report.display()))?;
    let report: AnalyzerReport = serde_json::from_str(&text)
        .with_context(|| format!("parse analyzer report '{}'", args.report.display()))?;

    let plan = ReportPlan {
        check_name: args
            .check_name
            .or(config.check_name)
            .unwrap_or_else(|| DEFAULT_CHECK_NAME.to_string()),
        workspace_root: args.workspace.unwrap_or_default(),
        suppressed_files: config.suppress.files,
        suppressed_categories: config.suppress.categories,
        changed_only: false,
        changed_files: BTreeSet::new(),
    };

    let run = run_report(&report, &plan);

    let rendered = match args.format {
        ReportFormat::Lines => {
            let records = LineRecordRenderer.render(&run.pages);
            if records.is_empty() {
                String::new()
            } else {
                records.join("\n") + "\n"
            }
        }
        ReportFormat::CheckJson => {
            let updates = CheckRunRenderer.render(&run.pages);
            serde_json::to_string_pretty(&updates).context("render check json")? + "\n"
        }
    };

    match args.output {
        Some(path) => std::fs::write(&path, rendered)
            .with_context(|| format!("write output '{}'", path.display()))?,
        None => print!("{rendered}"),
    }

    info!("conclusion: {}", run.review.conclusion.as_str());
    Ok(())
}
