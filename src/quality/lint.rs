//! ESLint check for Node.js projects.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::parser::parse_eslint_json;
use super::process::{CommandRunner, CommandSpec, SystemRunner};
use super::results::LintResult;

/// `npx eslint . --format json --max-warnings 0`
///
/// Any warning makes eslint exit non-zero, so a clean exit means no findings.
#[must_use]
pub fn eslint_command() -> CommandSpec {
    CommandSpec::new(
        "npx",
        ["eslint", ".", "--format", "json", "--max-warnings", "0"],
    )
}

/// Runs ESLint and tabulates its JSON report.
pub struct EslintChecker {
    runner: Arc<dyn CommandRunner>,
}

impl EslintChecker {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Lint the project in `working_dir`. Never fails; problems become a
    /// failing result.
    #[must_use]
    pub fn check(&self, working_dir: &Path) -> LintResult {
        let command = eslint_command();

        let output = match self.runner.run(&command, working_dir) {
            Ok(output) => output,
            Err(e) => {
                warn!("ESLint could not be started: {:#}", e);
                return LintResult::failed(format!("❌ Linting check failed: {e:#}"));
            }
        };

        if output.success {
            return LintResult::clean("✅ No linting errors found");
        }

        if output.stdout.trim().is_empty() {
            let detail = output
                .stderr
                .lines()
                .find(|l| !l.trim().is_empty())
                .map_or_else(|| output.status_text(), |l| l.trim().to_string());
            return LintResult::failed(format!(
                "❌ Linting check failed: Command failed: {command} ({detail})"
            ));
        }

        match parse_eslint_json(&output.stdout) {
            Ok(counts) => {
                debug!(
                    "ESLint reported {} error(s), {} warning(s)",
                    counts.errors, counts.warnings
                );
                let message = if counts.errors > 0 {
                    format!(
                        "❌ Linting failed: {} error(s), {} warning(s)",
                        counts.errors, counts.warnings
                    )
                } else {
                    format!("⚠️ Linting warnings: {}", counts.warnings)
                };
                LintResult {
                    passed: counts.errors == 0,
                    errors: counts.errors,
                    warnings: counts.warnings,
                    message,
                }
            }
            Err(e) => {
                debug!("ESLint output is not JSON: {}", e);
                LintResult::failed("❌ Failed to parse linting results")
            }
        }
    }
}

/// Lint `working_dir` with the system's ESLint.
#[must_use]
pub fn check_linting(working_dir: &Path) -> LintResult {
    EslintChecker::new(Arc::new(SystemRunner)).check(working_dir)
}
