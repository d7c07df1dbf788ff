//! Integration tests for the quality-gate CLI

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const INPUT_VARS: &[&str] = &[
    "INPUT_GITHUB-TOKEN",
    "INPUT_COVERAGE-THRESHOLD",
    "INPUT_PROJECT-TYPE",
    "INPUT_COVERAGE-REPORT-PATH",
    "INPUT_JAVA-COMPILE",
];

/// Get a Command for the quality-gate binary, isolated from runner inputs
fn quality_gate() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("quality-gate"));
    for var in INPUT_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

fn detect_json(temp: &TempDir) -> Value {
    let output = quality_gate()
        .arg("--project")
        .arg(temp.path())
        .args(["detect", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help() {
    quality_gate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enforce coverage, lint and type-check gates"));
}

#[test]
fn test_version() {
    quality_gate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_detect_spring_boot_maven() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("pom.xml"),
        "<project><dependency><artifactId>spring-boot-starter-web</artifactId></dependency></project>",
    )
    .unwrap();

    quality_gate()
        .arg("--project")
        .arg(temp.path())
        .arg("detect")
        .assert()
        .success()
        .stdout(predicate::str::contains("springboot"))
        .stdout(predicate::str::contains("target/site/jacoco/jacoco.xml"))
        .stdout(predicate::str::contains("checkstyle:check"));
}

#[test]
fn test_detect_json_gradle_java() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("build.gradle"), "apply plugin: 'java'\n").unwrap();

    let json = detect_json(&temp);
    assert_eq!(json["project_type"], "java");
    assert_eq!(json["source"], "detected");
    assert_eq!(json["coverage_threshold"], 70);
    assert_eq!(json["commands"][0]["command"], "gradle check -x test");
}

#[test]
fn test_detect_json_defaults_to_nodejs() {
    let temp = TempDir::new().unwrap();

    let json = detect_json(&temp);
    assert_eq!(json["project_type"], "nodejs");
    assert_eq!(json["coverage_report"], "coverage/coverage-final.json");
    assert_eq!(
        json["commands"][0]["command"],
        "npx eslint . --format json --max-warnings 0"
    );
    assert_eq!(json["commands"][1]["command"], "npx tsc --noEmit");
}

#[test]
fn test_detect_honors_config_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("quality-gate.toml"),
        "coverage-threshold = 90\nproject-type = \"spring-boot\"\n",
    )
    .unwrap();

    let json = detect_json(&temp);
    assert_eq!(json["project_type"], "springboot");
    assert_eq!(json["source"], "configured");
    assert_eq!(json["coverage_threshold"], 90);
}

#[test]
fn test_action_input_variables() {
    let temp = TempDir::new().unwrap();

    let output = quality_gate()
        .env("INPUT_PROJECT-TYPE", "java")
        .env("INPUT_COVERAGE-REPORT-PATH", "build/jacoco.xml")
        .arg("--project")
        .arg(temp.path())
        .args(["detect", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["project_type"], "java");
    assert_eq!(json["coverage_report"], "build/jacoco.xml");
}

#[test]
fn test_dry_run_java_without_build_tool_fails() {
    let temp = TempDir::new().unwrap();

    quality_gate()
        .arg("--project")
        .arg(temp.path())
        .args(["run", "--dry-run", "--project-type", "java"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("## Code Quality Gate ❌ FAILED"))
        .stdout(predicate::str::contains(
            "❌ No Maven (pom.xml) or Gradle (build.gradle) found",
        ))
        .stdout(predicate::str::contains("Coverage report not found at"))
        .stdout(predicate::str::contains("✅ Java type checking (compile-time)"))
        .stdout(predicate::str::contains(
            "::error::Code quality gate checks failed",
        ))
        .stderr(predicate::str::contains("Using configured project type: java"));
}

#[test]
fn test_dry_run_passing_java_project() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("pom.xml"), "<project/>").unwrap();
    let jacoco_dir = temp.path().join("target/site/jacoco");
    std::fs::create_dir_all(&jacoco_dir).unwrap();
    std::fs::write(
        jacoco_dir.join("jacoco.xml"),
        r#"<report name="demo"><counter type="LINE" missed="10" covered="90"/></report>"#,
    )
    .unwrap();

    // No mvn on PATH: checkstyle produces no output and passes.
    quality_gate()
        .env("PATH", temp.path())
        .arg("--project")
        .arg(temp.path())
        .args(["run", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Code Quality Gate ✅ PASSED"))
        .stdout(predicate::str::contains("✅ Coverage: 90% (threshold: 70%)"))
        .stdout(predicate::str::contains("✅ All quality gates passed!"))
        .stdout(predicate::str::contains("::error::").not())
        .stderr(predicate::str::contains("Detected project type: java"));
}

#[test]
fn test_malformed_config_file_is_one_error_command() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("quality-gate.toml"),
        "coverage-threshold = [\n",
    )
    .unwrap();

    let output = quality_gate()
        .arg("--project")
        .arg(temp.path())
        .args(["run", "--dry-run"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "unexpected stdout: {stdout}");
    assert!(lines[0].starts_with("::error::Action failed: Configuration error: failed to parse"));
    assert!(lines[0].contains("%0A"));
}

#[test]
fn test_default_subcommand_is_run() {
    let temp = TempDir::new().unwrap();

    quality_gate()
        .arg("--project")
        .arg(temp.path())
        .args(["--dry-run", "--project-type", "java"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("## Code Quality Gate"));
}

#[test]
fn test_invalid_project_type() {
    let temp = TempDir::new().unwrap();

    quality_gate()
        .arg("--project")
        .arg(temp.path())
        .args(["run", "--dry-run", "--project-type", "rust"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "::error::Action failed: Invalid configuration: project-type",
        ));
}

#[test]
fn test_threshold_out_of_range() {
    let temp = TempDir::new().unwrap();

    quality_gate()
        .arg("--project")
        .arg(temp.path())
        .args(["run", "--dry-run", "--coverage-threshold", "150"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("coverage-threshold"));
}

#[test]
fn test_run_outside_actions_needs_context() {
    let temp = TempDir::new().unwrap();

    quality_gate()
        .env_remove("GITHUB_REPOSITORY")
        .arg("--project")
        .arg(temp.path())
        .args(["run", "--project-type", "java"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "::error::Action failed: GitHub context unavailable",
        ));
}

#[test]
fn test_missing_project_directory() {
    let temp = TempDir::new().unwrap();

    quality_gate()
        .arg("--project")
        .arg(temp.path().join("does-not-exist"))
        .arg("detect")
        .assert()
        .failure()
        .stdout(predicate::str::contains("is not a directory"));
}
