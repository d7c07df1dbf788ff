//! Publishing gate results.
//!
//! - [`github`] - PR comment and check run through the GitHub REST API
//! - [`ConsoleReporter`] - prints the summary instead (dry runs)
//!
//! Both publish the same Markdown summary, rendered by [`render_markdown`].

pub mod github;

use async_trait::async_trait;
use tracing::info;

use crate::quality::results::QualityCheckResults;
use crate::Result;

pub use github::{GitHubContext, GitHubReporter, PullRequestRef};

/// Name of the check run and title of its output.
pub const CHECK_NAME: &str = "Code Quality Gate";

/// Destination for the combined results of a run.
///
/// Calls are made once per run, comment first, and are not retried.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Publish the summary as a pull request comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination rejects the comment.
    async fn post_comment(&self, results: &QualityCheckResults) -> Result<()>;

    /// Publish the verdict as a commit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination rejects the status.
    async fn set_check_status(&self, results: &QualityCheckResults) -> Result<()>;
}

/// Render the Markdown summary shared by the comment and the check run.
#[must_use]
pub fn render_markdown(results: &QualityCheckResults) -> String {
    let all_passed = results.all_passed();
    let status = if all_passed { "✅ PASSED" } else { "❌ FAILED" };
    let footer = if all_passed {
        "**All quality gates passed!** 🎉"
    } else {
        "**Please fix the issues above before merging.**"
    };

    format!(
        r#"## {CHECK_NAME} {status}

### Coverage
{}

### Linting
{}

### Type Checking
{}

---
{footer}
"#,
        results.coverage.message, results.lint.message, results.type_check.message
    )
}

/// Check-run conclusion for the results.
#[must_use]
pub fn conclusion(results: &QualityCheckResults) -> &'static str {
    if results.all_passed() {
        "success"
    } else {
        "failure"
    }
}

/// Escape a message for an Actions workflow command (`::error::<data>`).
///
/// The runner ends a command at the first line break, so `%`, `\r` and `\n`
/// are percent-encoded.
#[must_use]
pub fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Writes the summary to stdout instead of calling an API.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

#[async_trait]
impl Reporter for ConsoleReporter {
    async fn post_comment(&self, results: &QualityCheckResults) -> Result<()> {
        println!("{}", render_markdown(results));
        Ok(())
    }

    async fn set_check_status(&self, results: &QualityCheckResults) -> Result<()> {
        info!("Check run '{}' would conclude: {}", CHECK_NAME, conclusion(results));
        Ok(())
    }
}
