//! Coverage threshold check.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::parser::parse_coverage_report;
use super::results::CoverageResult;

/// Threshold used when none is configured.
pub const DEFAULT_COVERAGE_THRESHOLD: u32 = 70;

/// Reads a coverage report relative to a project directory and compares the
/// line percentage with a threshold.
#[derive(Debug, Clone)]
pub struct CoverageChecker {
    project_dir: PathBuf,
}

impl CoverageChecker {
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Check the report at `report_path` (relative paths resolve against the
    /// project directory). Never fails; problems become a failing result.
    #[must_use]
    pub fn check(&self, report_path: &Path, threshold: u32) -> CoverageResult {
        let resolved = self.project_dir.join(report_path);

        if !resolved.exists() {
            warn!("Coverage report not found at {}", resolved.display());
            return CoverageResult::failed(
                threshold,
                format!("Coverage report not found at {}", report_path.display()),
            );
        }

        match std::fs::read_to_string(&resolved) {
            Ok(content) => {
                let coverage = parse_coverage_report(&content, report_path);
                debug!("Parsed {}% line coverage from {}", coverage, resolved.display());
                CoverageResult::measured(coverage, threshold)
            }
            Err(e) => CoverageResult::failed(threshold, format!("Error checking coverage: {e}")),
        }
    }
}

/// Check the coverage report at `report_path`, relative to the current
/// directory.
#[must_use]
pub fn check_coverage(report_path: &Path, threshold: u32) -> CoverageResult {
    CoverageChecker::new(".").check(report_path, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_report(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_report_fails_and_names_path() {
        let temp = TempDir::new().unwrap();
        let result = CoverageChecker::new(temp.path())
            .check(Path::new("coverage/coverage-final.json"), 70);

        assert!(!result.passed);
        assert_eq!(result.coverage, 0);
        assert_eq!(result.threshold, 70);
        assert_eq!(
            result.message,
            "Coverage report not found at coverage/coverage-final.json"
        );
    }

    #[test]
    fn test_jacoco_report_above_threshold() {
        let temp = TempDir::new().unwrap();
        write_report(
            temp.path(),
            "target/site/jacoco/jacoco.xml",
            r#"<report><counter type="LINE" missed="10" covered="90"/></report>"#,
        );

        let result = CoverageChecker::new(temp.path())
            .check(Path::new("target/site/jacoco/jacoco.xml"), 80);
        assert!(result.passed);
        assert_eq!(result.coverage, 90);
        assert_eq!(result.message, "✅ Coverage: 90% (threshold: 80%)");
    }

    #[test]
    fn test_json_summary_below_threshold() {
        let temp = TempDir::new().unwrap();
        write_report(
            temp.path(),
            "coverage/coverage-summary.json",
            r#"{"total":{"lines":{"total":1000,"covered":834,"skipped":0,"pct":83.4}}}"#,
        );

        let result = CoverageChecker::new(temp.path())
            .check(Path::new("coverage/coverage-summary.json"), 90);
        assert!(!result.passed);
        assert_eq!(result.coverage, 83);
        assert_eq!(result.message, "❌ Coverage: 83% (threshold: 90%)");
    }

    #[test]
    fn test_threshold_boundary_passes() {
        let temp = TempDir::new().unwrap();
        write_report(temp.path(), "coverage.txt", "Lines        : 57.6% ( 576/1000 )");

        let result = CoverageChecker::new(temp.path()).check(Path::new("coverage.txt"), 58);
        assert!(result.passed);
        assert_eq!(result.coverage, 58);
    }

    #[test]
    fn test_unrecognised_report_is_zero() {
        let temp = TempDir::new().unwrap();
        write_report(temp.path(), "coverage.txt", "nothing useful");

        let result = CoverageChecker::new(temp.path()).check(Path::new("coverage.txt"), 1);
        assert!(!result.passed);
        assert_eq!(result.coverage, 0);
        assert!(result.message.starts_with("❌ Coverage: 0%"));
    }

    #[test]
    fn test_zero_threshold_passes_with_zero_coverage() {
        let temp = TempDir::new().unwrap();
        write_report(temp.path(), "coverage.txt", "");

        let result = CoverageChecker::new(temp.path()).check(Path::new("coverage.txt"), 0);
        assert!(result.passed);
    }

    #[test]
    fn test_unreadable_report_is_error_result() {
        let temp = TempDir::new().unwrap();
        // A directory exists but cannot be read as a file.
        std::fs::create_dir_all(temp.path().join("coverage.json")).unwrap();

        let result = CoverageChecker::new(temp.path()).check(Path::new("coverage.json"), 70);
        assert!(!result.passed);
        assert_eq!(result.coverage, 0);
        assert!(result.message.starts_with("Error checking coverage:"));
    }

    #[test]
    fn test_absolute_report_path() {
        let temp = TempDir::new().unwrap();
        write_report(temp.path(), "lcov.info", "SF:a.ts\nLF:4\nLH:4\nend_of_record\n");
        let absolute = temp.path().join("lcov.info");

        let result = CoverageChecker::new("/nonexistent-project").check(&absolute, 100);
        assert!(result.passed);
        assert_eq!(result.coverage, 100);
    }
}
