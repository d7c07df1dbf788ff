//! Checkstyle and compilation checks for Maven and Gradle projects.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::parser::count_build_markers;
use super::process::{CommandRunner, CommandSpec, SystemRunner};
use super::results::{CompileResult, LintResult, TypeCheckResult};
use crate::project::ProjectDetector;

/// Build tool driving a JVM project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTool {
    Maven,
    Gradle,
}

impl BuildTool {
    /// Detect the build tool in `project_dir`; Maven wins when both exist.
    #[must_use]
    pub fn detect(project_dir: &Path) -> Option<Self> {
        let detector = ProjectDetector::new(project_dir);
        if detector.has_maven() {
            Some(Self::Maven)
        } else if detector.gradle_build_file().is_some() {
            Some(Self::Gradle)
        } else {
            None
        }
    }

    /// Command running the lint (checkstyle) step.
    #[must_use]
    pub fn lint_command(&self) -> CommandSpec {
        match self {
            Self::Maven => CommandSpec::new(
                "mvn",
                ["clean", "compile", "checkstyle:check", "-DskipTests"],
            ),
            Self::Gradle => CommandSpec::new("gradle", ["check", "-x", "test"]),
        }
    }

    /// Command running a full compile without tests.
    #[must_use]
    pub fn compile_command(&self) -> CommandSpec {
        match self {
            Self::Maven => CommandSpec::new("mvn", ["clean", "compile", "-DskipTests"]),
            Self::Gradle => CommandSpec::new("gradle", ["build", "-x", "test"]),
        }
    }
}

/// Runs Maven/Gradle checks and tabulates their console output.
pub struct JavaChecker {
    runner: Arc<dyn CommandRunner>,
}

impl JavaChecker {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run checkstyle through the project's build tool. Never fails.
    ///
    /// Without a build descriptor the check fails immediately and nothing is
    /// run. Warnings are reported but never fail the check.
    #[must_use]
    pub fn check_linting(&self, working_dir: &Path) -> LintResult {
        let Some(tool) = BuildTool::detect(working_dir) else {
            return LintResult::failed("❌ No Maven (pom.xml) or Gradle (build.gradle) found");
        };

        let command = tool.lint_command();
        let output = match self.runner.run(&command, working_dir) {
            Ok(output) => output.combined(),
            Err(e) => {
                // Nothing was captured; the marker count below stays at zero.
                warn!("{:#}", e);
                String::new()
            }
        };

        let counts = count_build_markers(&output);
        debug!(
            "`{}` reported {} error marker(s), {} warning marker(s)",
            command, counts.errors, counts.warnings
        );

        if counts.errors > 0 {
            return LintResult {
                passed: false,
                errors: counts.errors,
                warnings: counts.warnings,
                message: format!(
                    "❌ Checkstyle failed: {} error(s), {} warning(s)",
                    counts.errors, counts.warnings
                ),
            };
        }

        LintResult {
            passed: true,
            errors: 0,
            warnings: counts.warnings,
            message: if counts.warnings > 0 {
                format!("⚠️ Checkstyle passed with {} warning(s)", counts.warnings)
            } else {
                "✅ Checkstyle passed".to_string()
            },
        }
    }

    /// Compile the project without tests. Never fails.
    #[must_use]
    pub fn check_compilation(&self, working_dir: &Path) -> CompileResult {
        self.compile(working_dir).0
    }

    /// Compilation as a type-check result, counting `[ERROR]` markers with a
    /// floor of one on failure.
    #[must_use]
    pub fn check_compilation_types(&self, working_dir: &Path) -> TypeCheckResult {
        let (result, output) = self.compile(working_dir);
        if result.passed {
            TypeCheckResult::passed(result.message)
        } else {
            TypeCheckResult::failed(count_build_markers(&output).errors, result.message)
        }
    }

    fn compile(&self, working_dir: &Path) -> (CompileResult, String) {
        // Gradle is assumed whenever there is no pom.xml.
        let tool = if ProjectDetector::new(working_dir).has_maven() {
            BuildTool::Maven
        } else {
            BuildTool::Gradle
        };
        let command = tool.compile_command();

        match self.runner.run(&command, working_dir) {
            Ok(output) if output.success => (
                CompileResult {
                    passed: true,
                    message: "✅ Java compilation successful".to_string(),
                },
                output.combined(),
            ),
            Ok(output) => (
                CompileResult {
                    passed: false,
                    message: format!(
                        "❌ Java compilation failed: Command failed: {} ({})",
                        command,
                        output.status_text()
                    ),
                },
                output.combined(),
            ),
            Err(e) => (
                CompileResult {
                    passed: false,
                    message: format!("❌ Java compilation failed: {e:#}"),
                },
                String::new(),
            ),
        }
    }
}

/// Run checkstyle in `working_dir` with the system's Maven or Gradle.
#[must_use]
pub fn check_java_linting(working_dir: &Path) -> LintResult {
    JavaChecker::new(Arc::new(SystemRunner)).check_linting(working_dir)
}

/// Compile `working_dir` with the system's Maven or Gradle.
#[must_use]
pub fn check_java_compilation(working_dir: &Path) -> CompileResult {
    JavaChecker::new(Arc::new(SystemRunner)).check_compilation(working_dir)
}
