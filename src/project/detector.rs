//! Marker-file based project type detection.
//!
//! # Example
//!
//! ```rust,ignore
//! use quality_gate::project::ProjectDetector;
//!
//! let detector = ProjectDetector::new("/path/to/project");
//! println!("Detected project type: {}", detector.detect());
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ProjectType, GRADLE_BUILD_FILES, MAVEN_DESCRIPTOR, NODE_MANIFEST};

/// Marker inside `pom.xml` identifying a Spring Boot project.
const MAVEN_SPRING_MARKER: &str = "spring-boot-starter";
/// Marker inside a Gradle build file identifying a Spring Boot project.
const GRADLE_SPRING_MARKER: &str = "spring-boot";

/// Detects the project type of a directory from its build descriptors.
///
/// Maven takes priority over Gradle, and both over Node. The Spring Boot
/// markers are plain case-sensitive substring matches, so a marker inside a
/// comment still counts.
pub struct ProjectDetector {
    project_dir: PathBuf,
}

impl ProjectDetector {
    /// Create a new detector for the given project directory.
    pub fn new<P: AsRef<Path>>(project_dir: P) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Detect the project type. Never fails; defaults to Node.js.
    #[must_use]
    pub fn detect(&self) -> ProjectType {
        let pom = self.project_dir.join(MAVEN_DESCRIPTOR);
        if pom.exists() {
            return Self::classify_jvm(&pom, MAVEN_SPRING_MARKER);
        }

        if let Some(gradle) = self.gradle_build_file() {
            return Self::classify_jvm(&gradle, GRADLE_SPRING_MARKER);
        }

        if self.project_dir.join(NODE_MANIFEST).exists() {
            debug!("Found {}", NODE_MANIFEST);
        } else {
            debug!("No build descriptor found, defaulting to nodejs");
        }
        ProjectType::NodeJs
    }

    /// Whether a Maven descriptor is present.
    #[must_use]
    pub fn has_maven(&self) -> bool {
        self.project_dir.join(MAVEN_DESCRIPTOR).exists()
    }

    /// First Gradle build file present, Groovy DSL before Kotlin DSL.
    #[must_use]
    pub fn gradle_build_file(&self) -> Option<PathBuf> {
        GRADLE_BUILD_FILES
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|path| path.exists())
    }

    fn classify_jvm(descriptor: &Path, spring_marker: &str) -> ProjectType {
        // An unreadable descriptor still marks a JVM project.
        let content = std::fs::read_to_string(descriptor).unwrap_or_default();
        let detected = if content.contains(spring_marker) {
            ProjectType::SpringBoot
        } else {
            ProjectType::Java
        };
        debug!("Classified {} as {}", descriptor.display(), detected);
        detected
    }
}
