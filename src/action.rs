//! One end-to-end gate run: resolve the project, check, report.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::config::{ActionConfig, ProjectTypeSetting};
use crate::error::Result;
use crate::project::{ProjectDetector, ProjectType};
use crate::quality::java::BuildTool;
use crate::quality::lint::eslint_command;
use crate::quality::orchestrator::{CheckPlan, GateOrchestrator};
use crate::quality::process::{CommandRunner, CommandSpec};
use crate::quality::results::QualityCheckResults;
use crate::quality::typecheck::tsc_command;
use crate::reporting::Reporter;

/// What a run found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub project_type: ProjectType,
    pub coverage_report: PathBuf,
    pub results: QualityCheckResults,
}

impl GateOutcome {
    /// True when every gate passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.results.all_passed()
    }
}

/// Project type to check: the explicit setting, else detection.
#[must_use]
pub fn resolve_project_type(config: &ActionConfig) -> ProjectType {
    match config.project_type {
        ProjectTypeSetting::Explicit(ty) => ty,
        ProjectTypeSetting::Auto => ProjectDetector::new(&config.project_dir).detect(),
    }
}

/// Build the check plan for `config`.
#[must_use]
pub fn plan_for(config: &ActionConfig) -> CheckPlan {
    let project_type = resolve_project_type(config);
    CheckPlan::new(
        project_type,
        config.coverage_report_for(project_type),
        config.coverage_threshold,
    )
    .with_java_compile(config.java_compile)
}

/// A tool a run would invoke, and whether it is installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCommand {
    pub command: String,
    pub program: String,
    pub available: bool,
}

/// What a run would do, without running anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionReport {
    pub project_type: ProjectType,
    /// `detected` or `configured`.
    pub source: &'static str,
    pub coverage_report: PathBuf,
    pub coverage_threshold: u32,
    /// Empty for a JVM project without Maven or Gradle.
    pub commands: Vec<PlannedCommand>,
}

/// External commands a run with `plan` would invoke in `project_dir`.
#[must_use]
pub fn planned_commands(project_dir: &Path, plan: &CheckPlan) -> Vec<CommandSpec> {
    if !plan.project_type.is_jvm() {
        return vec![eslint_command(), tsc_command()];
    }
    match BuildTool::detect(project_dir) {
        Some(tool) if plan.java_compile => vec![tool.lint_command(), tool.compile_command()],
        Some(tool) => vec![tool.lint_command()],
        None => Vec::new(),
    }
}

/// Describe the plan for `config`, checking tool availability with `runner`.
#[must_use]
pub fn describe(config: &ActionConfig, runner: &dyn CommandRunner) -> DetectionReport {
    let plan = plan_for(config);
    let source = match config.project_type {
        ProjectTypeSetting::Auto => "detected",
        ProjectTypeSetting::Explicit(_) => "configured",
    };
    let commands = planned_commands(&config.project_dir, &plan)
        .into_iter()
        .map(|cmd| PlannedCommand {
            command: cmd.to_string(),
            available: runner.is_available(&cmd.program),
            program: cmd.program,
        })
        .collect();

    DetectionReport {
        project_type: plan.project_type,
        source,
        coverage_report: plan.coverage_report,
        coverage_threshold: plan.threshold,
        commands,
    }
}

/// Run the gates and publish the results.
///
/// The comment is posted before the check run; the per-gate lines are logged
/// only once both have been published.
///
/// # Errors
///
/// Returns the first reporting error. Check failures are not errors; they
/// are reported through [`GateOutcome::passed`].
pub async fn run_action(
    config: &ActionConfig,
    orchestrator: &GateOrchestrator,
    reporter: &dyn Reporter,
) -> Result<GateOutcome> {
    info!("Starting code quality gate checks...");

    let plan = plan_for(config);
    match config.project_type {
        ProjectTypeSetting::Auto => info!("Detected project type: {}", plan.project_type),
        ProjectTypeSetting::Explicit(_) => {
            info!("Using configured project type: {}", plan.project_type);
        }
    }

    let results = orchestrator.run_checks(&plan).await;

    reporter.post_comment(&results).await?;
    reporter.set_check_status(&results).await?;

    info!("Coverage: {}", results.coverage.message);
    info!("Linting: {}", results.lint.message);
    info!("Type Check: {}", results.type_check.message);

    Ok(GateOutcome {
        project_type: plan.project_type,
        coverage_report: plan.coverage_report,
        results,
    })
}
