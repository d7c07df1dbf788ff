//! Concurrent execution of the three gates.
//!
//! Each check runs on tokio's blocking pool since it waits on an external
//! process. The three are joined, not raced: the slowest one determines the
//! total time, and no check's outcome affects another.
//!
//! # Example
//!
//! ```rust,ignore
//! use quality_gate::quality::orchestrator::{CheckPlan, GateOrchestrator};
//!
//! let orchestrator = GateOrchestrator::system(".");
//! let plan = CheckPlan::new(ProjectType::NodeJs, "coverage/coverage-final.json", 70);
//! let results = orchestrator.run_checks(&plan).await;
//! println!("all passed: {}", results.all_passed());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join3;
use tracing::{debug, error};

use super::coverage::CoverageChecker;
use super::java::JavaChecker;
use super::lint::EslintChecker;
use super::process::{CommandRunner, SystemRunner};
use super::results::{CoverageResult, LintResult, QualityCheckResults, TypeCheckResult};
use super::typecheck::TscChecker;
use crate::project::ProjectType;

/// What to check for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPlan {
    pub project_type: ProjectType,
    pub coverage_report: PathBuf,
    pub threshold: u32,
    /// Replace the JVM type-check placeholder with a real compile.
    pub java_compile: bool,
}

impl CheckPlan {
    pub fn new(
        project_type: ProjectType,
        coverage_report: impl Into<PathBuf>,
        threshold: u32,
    ) -> Self {
        Self {
            project_type,
            coverage_report: coverage_report.into(),
            threshold,
            java_compile: false,
        }
    }

    /// Enable/disable the compile step for JVM projects.
    #[must_use]
    pub fn with_java_compile(mut self, enabled: bool) -> Self {
        self.java_compile = enabled;
        self
    }
}

/// Runs the coverage, lint and type checks for a project.
pub struct GateOrchestrator {
    project_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl GateOrchestrator {
    pub fn new(project_dir: impl AsRef<Path>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            runner,
        }
    }

    /// Orchestrator invoking real tools.
    pub fn system(project_dir: impl AsRef<Path>) -> Self {
        Self::new(project_dir, Arc::new(SystemRunner))
    }

    /// Run the three checks for `plan` concurrently and collect the results.
    pub async fn run_checks(&self, plan: &CheckPlan) -> QualityCheckResults {
        let start = Instant::now();

        let coverage = {
            let checker = CoverageChecker::new(&self.project_dir);
            let report = plan.coverage_report.clone();
            let threshold = plan.threshold;
            run_blocking("Coverage", move || checker.check(&report, threshold), move |msg| {
                CoverageResult::failed(threshold, msg)
            })
        };

        let results = if plan.project_type.is_jvm() {
            let lint = {
                let checker = JavaChecker::new(Arc::clone(&self.runner));
                let dir = self.project_dir.clone();
                run_blocking("Checkstyle", move || checker.check_linting(&dir), |msg| {
                    LintResult::failed(msg)
                })
            };
            let java_compile = plan.java_compile;
            let type_check = {
                let checker = JavaChecker::new(Arc::clone(&self.runner));
                let dir = self.project_dir.clone();
                run_blocking(
                    "Compilation",
                    move || {
                        if java_compile {
                            checker.check_compilation_types(&dir)
                        } else {
                            TypeCheckResult::compile_time_stub()
                        }
                    },
                    |msg| TypeCheckResult::failed(1, msg),
                )
            };
            let (coverage, lint, type_check) = join3(coverage, lint, type_check).await;
            QualityCheckResults {
                coverage,
                lint,
                type_check,
            }
        } else {
            let lint = {
                let checker = EslintChecker::new(Arc::clone(&self.runner));
                let dir = self.project_dir.clone();
                run_blocking("ESLint", move || checker.check(&dir), |msg| {
                    LintResult::failed(msg)
                })
            };
            let type_check = {
                let checker = TscChecker::new(Arc::clone(&self.runner));
                let dir = self.project_dir.clone();
                run_blocking("TypeScript", move || checker.check(&dir), |msg| {
                    TypeCheckResult::failed(1, msg)
                })
            };
            let (coverage, lint, type_check) = join3(coverage, lint, type_check).await;
            QualityCheckResults {
                coverage,
                lint,
                type_check,
            }
        };

        debug!(
            "Checks for {} finished in {}ms",
            plan.project_type,
            start.elapsed().as_millis()
        );
        results
    }
}

/// Run a blocking check on the blocking pool, turning a panic into a failing
/// result built by `on_panic`.
async fn run_blocking<T, F, P>(name: &'static str, check: F, on_panic: P) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
    P: FnOnce(String) -> T,
{
    match tokio::task::spawn_blocking(check).await {
        Ok(result) => result,
        Err(e) => {
            error!("{} check panicked: {}", name, e);
            on_panic(format!("❌ {name} check crashed: {e}"))
        }
    }
}
