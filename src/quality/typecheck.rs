//! TypeScript type check.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::parser::count_tsc_errors;
use super::process::{CommandRunner, CommandSpec, SystemRunner};
use super::results::TypeCheckResult;

/// `npx tsc --noEmit`
#[must_use]
pub fn tsc_command() -> CommandSpec {
    CommandSpec::new("npx", ["tsc", "--noEmit"])
}

/// Runs the TypeScript compiler in check-only mode.
pub struct TscChecker {
    runner: Arc<dyn CommandRunner>,
}

impl TscChecker {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Type-check the project in `working_dir`. Never fails; a failed run
    /// reports at least one error.
    #[must_use]
    pub fn check(&self, working_dir: &Path) -> TypeCheckResult {
        let failure_text = match self.runner.run(&tsc_command(), working_dir) {
            Ok(output) if output.success => {
                return TypeCheckResult::passed("✅ No TypeScript errors found");
            }
            Ok(output) => output.combined(),
            Err(e) => format!("{e:#}"),
        };

        let errors = count_tsc_errors(&failure_text).max(1);
        debug!("tsc reported {} error(s)", errors);
        TypeCheckResult::failed(
            errors,
            format!("❌ TypeScript errors found: {errors} error(s)"),
        )
    }
}

/// Type-check `working_dir` with the system's TypeScript compiler.
#[must_use]
pub fn check_types(working_dir: &Path) -> TypeCheckResult {
    TscChecker::new(Arc::new(SystemRunner)).check(working_dir)
}
