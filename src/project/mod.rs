//! Project type representation and detection.
//!
//! The project type decides which checks run and where the coverage report is
//! expected by default.
//!
//! # Example
//!
//! ```rust
//! use quality_gate::project::ProjectType;
//!
//! let ty: ProjectType = "springboot".parse().unwrap();
//! assert_eq!(ty, ProjectType::SpringBoot);
//! assert!(ty.is_jvm());
//! assert_eq!(ty.default_coverage_path(), "target/site/jacoco/jacoco.xml");
//! assert_eq!(ty.to_string(), "springboot");
//! ```

pub mod detector;

use std::fmt;
use std::str::FromStr;

pub use detector::ProjectDetector;

/// Maven project descriptor.
pub const MAVEN_DESCRIPTOR: &str = "pom.xml";
/// Gradle build files, Groovy DSL first.
pub const GRADLE_BUILD_FILES: &[&str] = &["build.gradle", "build.gradle.kts"];
/// Node package manifest.
pub const NODE_MANIFEST: &str = "package.json";

/// Kind of project the gate is running against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Node.js / TypeScript project
    #[serde(rename = "nodejs")]
    NodeJs,
    /// Plain Java project built with Maven or Gradle
    Java,
    /// Spring Boot project built with Maven or Gradle
    #[serde(rename = "springboot")]
    SpringBoot,
}

static ALL_PROJECT_TYPES: &[ProjectType] =
    &[ProjectType::NodeJs, ProjectType::Java, ProjectType::SpringBoot];

impl ProjectType {
    /// Returns all project types.
    #[must_use]
    pub fn all() -> &'static [ProjectType] {
        ALL_PROJECT_TYPES
    }

    /// Canonical lowercase tag, as accepted by the `project-type` input.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NodeJs => "nodejs",
            Self::Java => "java",
            Self::SpringBoot => "springboot",
        }
    }

    /// Whether checks run through Maven/Gradle rather than the Node toolchain.
    #[must_use]
    pub fn is_jvm(&self) -> bool {
        matches!(self, Self::Java | Self::SpringBoot)
    }

    /// Coverage report location used when no explicit path is configured.
    #[must_use]
    pub fn default_coverage_path(&self) -> &'static str {
        match self {
            Self::NodeJs => "coverage/coverage-final.json",
            Self::Java | Self::SpringBoot => "target/site/jacoco/jacoco.xml",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown project type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProjectTypeError {
    input: String,
}

impl fmt::Display for ParseProjectTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown project type '{}' (expected one of: nodejs, java, springboot)",
            self.input
        )
    }
}

impl std::error::Error for ParseProjectTypeError {}

impl FromStr for ProjectType {
    type Err = ParseProjectTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nodejs" | "node" => Ok(Self::NodeJs),
            "java" => Ok(Self::Java),
            "springboot" | "spring-boot" => Ok(Self::SpringBoot),
            _ => Err(ParseProjectTypeError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for ty in ProjectType::all() {
            assert_eq!(ty.as_str().parse::<ProjectType>(), Ok(*ty));
        }
    }

    #[test]
    fn test_parse_aliases_and_case() {
        assert_eq!("Node".parse::<ProjectType>(), Ok(ProjectType::NodeJs));
        assert_eq!(
            "spring-boot".parse::<ProjectType>(),
            Ok(ProjectType::SpringBoot)
        );
        assert_eq!(" JAVA ".parse::<ProjectType>(), Ok(ProjectType::Java));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "python".parse::<ProjectType>().unwrap_err();
        assert!(err.to_string().contains("'python'"));
    }

    #[test]
    fn test_default_coverage_paths() {
        assert_eq!(
            ProjectType::NodeJs.default_coverage_path(),
            "coverage/coverage-final.json"
        );
        assert_eq!(
            ProjectType::Java.default_coverage_path(),
            ProjectType::SpringBoot.default_coverage_path()
        );
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&ProjectType::SpringBoot).unwrap();
        assert_eq!(json, "\"springboot\"");
        let ty: ProjectType = serde_json::from_str("\"nodejs\"").unwrap();
        assert_eq!(ty, ProjectType::NodeJs);
    }
}
