//! quality-gate - pull request quality gates
//!
//! Detects the kind of project in a checkout, runs its coverage, lint and
//! type checks concurrently, and publishes the verdict as a pull request
//! comment plus a GitHub check run.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`action`] - One end-to-end run: resolve, check, report
//! - [`config`] - Input, configuration file and default layering
//! - [`error`] - Custom error types and handling
//! - [`project`] - Project type model and detection
//! - [`quality`] - The individual checks and their orchestration
//! - [`reporting`] - PR comment and check-run publishing
//! - [`testing`] - Test doubles for the process and reporting seams
//!
//! # Example
//!
//! ```rust,ignore
//! use quality_gate::action::run_action;
//! use quality_gate::config::ActionConfig;
//! use quality_gate::quality::GateOrchestrator;
//! use quality_gate::reporting::ConsoleReporter;
//!
//! let config = ActionConfig::new(".");
//! let orchestrator = GateOrchestrator::system(&config.project_dir);
//! let outcome = run_action(&config, &orchestrator, &ConsoleReporter).await?;
//! if !outcome.passed() {
//!     std::process::exit(1);
//! }
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod project;
pub mod quality;
pub mod reporting;
pub mod testing;

// Re-export commonly used types
pub use error::{GateError, Result};

pub use action::{run_action, GateOutcome};
pub use config::{ActionConfig, ActionInputs, ProjectTypeSetting};
pub use project::{ProjectDetector, ProjectType};
pub use quality::{
    CheckPlan, CommandRunner, CoverageResult, GateOrchestrator, LintResult, QualityCheckResults,
    SystemRunner, TypeCheckResult,
};
pub use reporting::{ConsoleReporter, GitHubContext, GitHubReporter, Reporter};
