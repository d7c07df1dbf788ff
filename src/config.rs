//! Configuration for a quality gate run.
//!
//! Values come from three layers, highest precedence first:
//!
//! 1. Command-line flags and `INPUT_*` variables set by the Actions runner
//! 2. `quality-gate.toml` in the project directory (or `--config <file>`)
//! 3. Built-in defaults
//!
//! # Example
//!
//! ```toml
//! coverage-threshold = 80
//! project-type = "springboot"
//! coverage-report-path = "build/reports/jacoco/test/jacocoTestReport.xml"
//! java-compile = true
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GateError, Result};
use crate::project::ProjectType;
use crate::quality::DEFAULT_COVERAGE_THRESHOLD;

/// Name of the optional configuration file in the project directory.
pub const CONFIG_FILE_NAME: &str = "quality-gate.toml";

// =============================================================================
// Project type setting
// =============================================================================

/// Requested project type: detected from the tree or given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectTypeSetting {
    #[default]
    Auto,
    Explicit(ProjectType),
}

impl fmt::Display for ProjectTypeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Explicit(ty) => write!(f, "{ty}"),
        }
    }
}

impl FromStr for ProjectTypeSetting {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse::<ProjectType>().map(Self::Explicit).map_err(|_| {
            GateError::invalid_config(
                "project-type",
                format!(
                    "unknown project type '{}' (expected one of: auto, nodejs, java, springboot)",
                    s.trim()
                ),
            )
        })
    }
}

// =============================================================================
// File layer
// =============================================================================

/// Contents of `quality-gate.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub coverage_threshold: Option<u32>,

    #[serde(default)]
    pub project_type: Option<String>,

    #[serde(default)]
    pub coverage_report_path: Option<PathBuf>,

    #[serde(default)]
    pub java_compile: Option<bool>,
}

impl FileConfig {
    /// Parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GateError::config_with_path(
                format!("failed to read {}: {e}", path.display()),
                path.to_path_buf(),
            )
        })?;
        toml::from_str(&content).map_err(|e| {
            GateError::config_with_path(
                format!("failed to parse {}: {e}", path.display()),
                path.to_path_buf(),
            )
        })
    }

    /// Load `explicit` if given, else `quality-gate.toml` in `project_dir`
    /// when present.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or if the chosen
    /// file cannot be parsed.
    pub fn discover(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(GateError::config_with_path(
                    format!("config file {} does not exist", path.display()),
                    path.to_path_buf(),
                ));
            }
            return Self::load(path);
        }

        let default_path = project_dir.join(CONFIG_FILE_NAME);
        if default_path.exists() {
            debug!("Loading configuration from {}", default_path.display());
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }
}

// =============================================================================
// Raw inputs
// =============================================================================

/// Unvalidated inputs from the command line and the Actions environment.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    pub project_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub github_token: Option<String>,
    pub coverage_threshold: Option<String>,
    pub project_type: Option<String>,
    pub coverage_report_path: Option<String>,
    pub java_compile: Option<bool>,
    pub dry_run: bool,
}

/// Treat blank values as unset, like the Actions input reader does.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Resolved configuration
// =============================================================================

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConfig {
    /// Directory every check runs in.
    pub project_dir: PathBuf,
    pub github_token: Option<String>,
    /// Minimum line coverage percentage, 0-100.
    pub coverage_threshold: u32,
    pub project_type: ProjectTypeSetting,
    /// Report location; the project type's default when unset.
    pub coverage_report_path: Option<PathBuf>,
    pub java_compile: bool,
    /// Print the summary instead of calling the GitHub API.
    pub dry_run: bool,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            github_token: None,
            coverage_threshold: DEFAULT_COVERAGE_THRESHOLD,
            project_type: ProjectTypeSetting::Auto,
            coverage_report_path: None,
            java_compile: false,
            dry_run: false,
        }
    }
}

impl ActionConfig {
    /// Create a configuration for `project_dir` with default settings.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            ..Self::default()
        }
    }

    /// Merge inputs over the configuration file and defaults, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is unreadable or any
    /// value is out of range.
    pub fn resolve(inputs: ActionInputs) -> Result<Self> {
        let project_dir = if inputs.project_dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            inputs.project_dir
        };
        let file = FileConfig::discover(&project_dir, inputs.config_path.as_deref())?;

        let coverage_threshold = match non_empty(inputs.coverage_threshold) {
            Some(raw) => parse_threshold(&raw)?,
            None => file.coverage_threshold.unwrap_or(DEFAULT_COVERAGE_THRESHOLD),
        };

        let project_type = match non_empty(inputs.project_type).or(non_empty(file.project_type)) {
            Some(raw) => raw.parse()?,
            None => ProjectTypeSetting::Auto,
        };

        let coverage_report_path = non_empty(inputs.coverage_report_path)
            .map(PathBuf::from)
            .or(file
                .coverage_report_path
                .filter(|p| !p.as_os_str().is_empty()));

        let config = Self {
            project_dir,
            github_token: non_empty(inputs.github_token),
            coverage_threshold,
            project_type,
            coverage_report_path,
            java_compile: inputs.java_compile.or(file.java_compile).unwrap_or(false),
            dry_run: inputs.dry_run,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.coverage_threshold > 100 {
            return Err(GateError::invalid_config(
                "coverage-threshold",
                format!("{} is not a percentage (0-100)", self.coverage_threshold),
            ));
        }
        if !self.project_dir.is_dir() {
            return Err(GateError::invalid_config(
                "project",
                format!("{} is not a directory", self.project_dir.display()),
            ));
        }
        Ok(())
    }

    /// Coverage report to read for `project_type`.
    #[must_use]
    pub fn coverage_report_for(&self, project_type: ProjectType) -> PathBuf {
        self.coverage_report_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(project_type.default_coverage_path()))
    }

    #[must_use]
    pub fn with_project_type(mut self, setting: ProjectTypeSetting) -> Self {
        self.project_type = setting;
        self
    }

    #[must_use]
    pub fn with_coverage_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.coverage_report_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_java_compile(mut self, enabled: bool) -> Self {
        self.java_compile = enabled;
        self
    }
}

fn parse_threshold(raw: &str) -> Result<u32> {
    let threshold: u32 = raw.parse().map_err(|_| {
        GateError::invalid_config(
            "coverage-threshold",
            format!("'{raw}' is not a whole number"),
        )
    })?;
    if threshold > 100 {
        return Err(GateError::invalid_config(
            "coverage-threshold",
            format!("{threshold} is not a percentage (0-100)"),
        ));
    }
    Ok(threshold)
}
