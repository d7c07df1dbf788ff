//! Result records produced by the individual checks.
//!
//! Every check resolves to one of these values, success or failure, so the
//! aggregation step never has to handle errors.

use serde::{Deserialize, Serialize};

/// Outcome of the coverage check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageResult {
    /// `coverage >= threshold`, or false when the report could not be used.
    pub passed: bool,
    /// Line coverage percentage, 0-100.
    pub coverage: u32,
    /// Minimum acceptable percentage.
    pub threshold: u32,
    /// Display message.
    pub message: String,
}

impl CoverageResult {
    /// Compare a measured percentage with the threshold.
    #[must_use]
    pub fn measured(coverage: u32, threshold: u32) -> Self {
        let passed = coverage >= threshold;
        let icon = if passed { "✅" } else { "❌" };
        Self {
            passed,
            coverage,
            threshold,
            message: format!("{icon} Coverage: {coverage}% (threshold: {threshold}%)"),
        }
    }

    /// A failure with zero coverage and an explanatory message.
    pub fn failed(threshold: u32, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            coverage: 0,
            threshold,
            message: message.into(),
        }
    }
}

/// Outcome of a lint check (eslint or checkstyle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintResult {
    pub passed: bool,
    pub errors: u32,
    pub warnings: u32,
    pub message: String,
}

impl LintResult {
    /// A clean pass with no findings.
    pub fn clean(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            errors: 0,
            warnings: 0,
            message: message.into(),
        }
    }

    /// A failure that could not be tabulated, counted as one error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: 1,
            warnings: 0,
            message: message.into(),
        }
    }
}

/// Outcome of the type check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCheckResult {
    pub passed: bool,
    pub errors: u32,
    pub message: String,
}

impl TypeCheckResult {
    /// A pass with no errors.
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            errors: 0,
            message: message.into(),
        }
    }

    /// A failure; the error count is never reported as zero.
    pub fn failed(errors: u32, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: errors.max(1),
            message: message.into(),
        }
    }

    /// Placeholder for JVM projects, where types are checked by the compiler.
    #[must_use]
    pub fn compile_time_stub() -> Self {
        Self::passed("✅ Java type checking (compile-time)")
    }
}

/// Outcome of the auxiliary Java compilation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    pub passed: bool,
    pub message: String,
}

/// Combined outcome of the three gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCheckResults {
    pub coverage: CoverageResult,
    pub lint: LintResult,
    pub type_check: TypeCheckResult,
}

impl QualityCheckResults {
    /// Whether every gate passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.coverage.passed && self.lint.passed && self.type_check.passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_threshold_boundary_passes() {
        let result = CoverageResult::measured(70, 70);
        assert!(result.passed);
        assert_eq!(result.message, "✅ Coverage: 70% (threshold: 70%)");
    }

    #[test]
    fn test_coverage_below_threshold_fails() {
        let result = CoverageResult::measured(69, 70);
        assert!(!result.passed);
        assert_eq!(result.message, "❌ Coverage: 69% (threshold: 70%)");
    }

    #[test]
    fn test_coverage_invariant_over_range() {
        for threshold in [0, 1, 50, 99, 100] {
            for coverage in 0..=100 {
                let result = CoverageResult::measured(coverage, threshold);
                assert_eq!(result.passed, coverage >= threshold);
            }
        }
    }

    #[test]
    fn test_type_check_failure_floor() {
        let result = TypeCheckResult::failed(0, "boom");
        assert!(!result.passed);
        assert_eq!(result.errors, 1);
    }

    #[test]
    fn test_all_passed_requires_every_gate() {
        let mut results = QualityCheckResults {
            coverage: CoverageResult::measured(90, 70),
            lint: LintResult::clean("ok"),
            type_check: TypeCheckResult::passed("ok"),
        };
        assert!(results.all_passed());

        results.lint = LintResult::failed("nope");
        assert!(!results.all_passed());

        results.lint = LintResult::clean("ok");
        results.type_check = TypeCheckResult::failed(3, "nope");
        assert!(!results.all_passed());

        results.type_check = TypeCheckResult::compile_time_stub();
        results.coverage = CoverageResult::failed(70, "missing");
        assert!(!results.all_passed());
    }
}
