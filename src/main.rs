//! quality-gate - coverage, lint and type checks for pull requests
//!
//! Runs as a GitHub Action step (inputs arrive as `INPUT_*` variables) or
//! locally from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quality_gate::action::{describe, run_action};
use quality_gate::config::{ActionConfig, ActionInputs};
use quality_gate::quality::{GateOrchestrator, SystemRunner};
use quality_gate::reporting::{
    escape_workflow_data, ConsoleReporter, GitHubContext, GitHubReporter, Reporter,
};

#[derive(Parser)]
#[command(name = "quality-gate")]
#[command(version)]
#[command(about = "Enforce coverage, lint and type-check gates on pull requests", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(flatten)]
    inputs: InputArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Action inputs; each is also read from the runner's `INPUT_*` variable.
#[derive(Args, Debug)]
struct InputArgs {
    /// Token used to comment and create the check run
    #[arg(long, global = true, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Minimum line coverage percentage [default: 70]
    #[arg(long, global = true, env = "INPUT_COVERAGE-THRESHOLD", value_name = "PERCENT")]
    coverage_threshold: Option<String>,

    /// auto, nodejs, java or springboot [default: auto]
    #[arg(long, global = true, env = "INPUT_PROJECT-TYPE", value_name = "TYPE")]
    project_type: Option<String>,

    /// Coverage report location [default: depends on project type]
    #[arg(long, global = true, env = "INPUT_COVERAGE-REPORT-PATH", value_name = "PATH")]
    coverage_report_path: Option<String>,

    /// Compile JVM projects instead of assuming compile-time type safety
    #[arg(
        long,
        global = true,
        env = "INPUT_JAVA-COMPILE",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    java_compile: Option<bool>,

    /// Configuration file [default: <project>/quality-gate.toml]
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the summary instead of calling the GitHub API
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all quality gates and report the results (default)
    Run,

    /// Show the detected project type and the checks that would run
    Detect {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let project_path = cli.project.canonicalize().unwrap_or(cli.project.clone());

    let config = match ActionConfig::resolve(ActionInputs {
        project_dir: project_path,
        config_path: cli.inputs.config,
        github_token: cli.inputs.github_token,
        coverage_threshold: cli.inputs.coverage_threshold,
        project_type: cli.inputs.project_type,
        coverage_report_path: cli.inputs.coverage_report_path,
        java_compile: cli.inputs.java_compile,
        dry_run: cli.inputs.dry_run,
    }) {
        Ok(config) => config,
        Err(e) => return set_failed(&format!("Action failed: {e}")),
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config).await,
        Commands::Detect { json } => match detect(&config, json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => set_failed(&format!("Action failed: {e:#}")),
        },
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "quality_gate=debug,info"
    } else {
        "quality_gate=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Logs go to stderr so stdout stays parseable (`detect --json`, dry runs).
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Report a failure the way the Actions runner expects and exit non-zero.
fn set_failed(message: &str) -> ExitCode {
    println!("::error::{}", escape_workflow_data(message));
    eprintln!("{} {}", "Error:".red().bold(), message);
    ExitCode::FAILURE
}

async fn run(config: &ActionConfig) -> ExitCode {
    let reporter: Box<dyn Reporter> = if config.dry_run {
        Box::new(ConsoleReporter)
    } else {
        let github = GitHubContext::from_env().and_then(|context| {
            GitHubReporter::new(config.github_token.clone().unwrap_or_default(), context)
        });
        match github {
            Ok(reporter) => Box::new(reporter),
            Err(e) => return set_failed(&format!("Action failed: {e}")),
        }
    };

    let orchestrator = GateOrchestrator::system(&config.project_dir);
    match run_action(config, &orchestrator, reporter.as_ref()).await {
        Ok(outcome) if outcome.passed() => {
            info!("✅ All quality gates passed!");
            println!("{}", "✅ All quality gates passed!".green().bold());
            ExitCode::SUCCESS
        }
        Ok(_) => set_failed("Code quality gate checks failed"),
        Err(e) => {
            error!("{}", e);
            set_failed(&format!("Action failed: {e}"))
        }
    }
}

fn detect(config: &ActionConfig, json: bool) -> anyhow::Result<()> {
    let report = describe(config, &SystemRunner);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "\n{} {} ({})",
        "Project type:".cyan().bold(),
        report.project_type.to_string().bold(),
        report.source
    );
    println!(
        "   Coverage report: {} (threshold: {}%)",
        report.coverage_report.display(),
        report.coverage_threshold
    );

    println!("\n{} Commands:", "Checks:".cyan().bold());
    if report.commands.is_empty() {
        println!("   {} No Maven (pom.xml) or Gradle (build.gradle) found", "✗".red());
    }
    for cmd in &report.commands {
        if cmd.available {
            println!("   {} {}", "✓".green(), cmd.command);
        } else {
            println!(
                "   {} {} - requires: {}",
                "✗".red(),
                cmd.command,
                cmd.program.yellow()
            );
        }
    }
    Ok(())
}
