//! Output parsing utilities for the quality checks.
//!
//! Each tool format sits behind one small function taking the raw text and
//! returning a percentage or counts, so a format can be swapped without
//! touching the checks that call it.
//!
//! # Coverage formats
//!
//! | Format | Source | Function |
//! |--------|--------|----------|
//! | Jacoco XML | Maven/Gradle jacoco plugin | [`parse_jacoco_xml`] |
//! | `coverage-summary.json` | istanbul `json-summary` reporter | [`parse_json_summary`] |
//! | `coverage-final.json` | istanbul `json` reporter | [`parse_istanbul_final`] |
//! | lcov tracefile | istanbul/c8/lcov | [`parse_lcov_tracefile`] |
//! | text summary | istanbul `text-summary` reporter | [`parse_text_summary`] |
//!
//! # Example
//!
//! ```rust
//! use quality_gate::quality::parser::{parse_jacoco_xml, parse_text_summary};
//!
//! assert_eq!(parse_jacoco_xml(r#"<counter type="LINE" missed="10" covered="90"/>"#), 90);
//! assert_eq!(parse_text_summary("Lines        : 57.6% ( 576/1000 )"), Some(58));
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// Percentages
// ============================================================================

/// Round a percentage to the nearest integer, clamped into `0..=100`.
///
/// Non-finite input yields 0.
#[must_use]
pub fn round_percentage(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u32
}

/// `covered / total` as a rounded percentage; 0 when `total` is 0.
#[must_use]
pub fn ratio_percentage(covered: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    round_percentage(covered as f64 / total as f64 * 100.0)
}

// ============================================================================
// Coverage Reports
// ============================================================================

/// Parse a coverage report, choosing the format from the file name first and
/// the content second. Returns 0 when nothing recognisable is found.
#[must_use]
pub fn parse_coverage_report(content: &str, report_path: &Path) -> u32 {
    let name = report_path.to_string_lossy();

    if name.ends_with(".xml") {
        return parse_jacoco_xml(content);
    }

    if name.ends_with(".info") {
        if let Some(pct) = parse_lcov_tracefile(content) {
            return pct;
        }
    }

    if let Ok(json) = serde_json::from_str::<Value>(content) {
        if let Some(pct) = parse_json_summary(&json).or_else(|| parse_istanbul_final(&json)) {
            return pct;
        }
    }

    parse_text_summary(content).unwrap_or(0)
}

fn jacoco_line_counter() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<counter type="LINE" missed="(\d+)" covered="(\d+)""#).ok())
        .as_ref()
}

/// Line coverage from a Jacoco XML report.
///
/// Uses the first `LINE` counter in the document; 0 when there is none, the
/// counter covers no lines, or a count does not fit in a `u64`.
#[must_use]
pub fn parse_jacoco_xml(content: &str) -> u32 {
    let Some(caps) = jacoco_line_counter().and_then(|re| re.captures(content)) else {
        return 0;
    };
    let (Ok(missed), Ok(covered)) = (caps[1].parse::<u64>(), caps[2].parse::<u64>()) else {
        return 0;
    };
    ratio_percentage(covered, missed.saturating_add(covered))
}

/// `total.lines.pct` from an istanbul `json-summary` report.
///
/// A missing, non-numeric or zero value yields `None` so the caller can try
/// the next format.
#[must_use]
pub fn parse_json_summary(json: &Value) -> Option<u32> {
    let pct = json.pointer("/total/lines/pct")?.as_f64()?;
    if pct == 0.0 {
        return None;
    }
    Some(round_percentage(pct))
}

/// One file entry of an istanbul `coverage-final.json` report.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IstanbulFileCoverage {
    statement_map: std::collections::HashMap<String, IstanbulLocation>,
    s: std::collections::HashMap<String, u64>,
}

#[derive(Debug, Deserialize)]
struct IstanbulLocation {
    start: IstanbulPosition,
}

#[derive(Debug, Deserialize)]
struct IstanbulPosition {
    line: u64,
}

/// Line coverage from an istanbul `coverage-final.json` report.
///
/// A line counts as covered when any statement starting on it executed.
/// Returns `None` if the document is not a map of file coverage entries.
#[must_use]
pub fn parse_istanbul_final(json: &Value) -> Option<u32> {
    let files = json.as_object()?;
    if files.is_empty() {
        return None;
    }

    let mut total_lines = 0u64;
    let mut covered_lines = 0u64;

    for entry in files.values() {
        let file = IstanbulFileCoverage::deserialize(entry).ok()?;
        let mut lines = BTreeSet::new();
        let mut hit = BTreeSet::new();
        for (id, location) in &file.statement_map {
            lines.insert(location.start.line);
            if file.s.get(id).copied().unwrap_or(0) > 0 {
                hit.insert(location.start.line);
            }
        }
        total_lines += lines.len() as u64;
        covered_lines += hit.len() as u64;
    }

    Some(ratio_percentage(covered_lines, total_lines))
}

/// Line coverage from an lcov tracefile: `sum(LH) / sum(LF)`.
///
/// Returns `None` when the file has no `LF` records.
#[must_use]
pub fn parse_lcov_tracefile(content: &str) -> Option<u32> {
    let mut found = 0u64;
    let mut hit = 0u64;
    let mut saw_record = false;

    for line in content.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("LF:") {
            saw_record = true;
            found += value.trim().parse::<u64>().unwrap_or(0);
        } else if let Some(value) = line.strip_prefix("LH:") {
            hit += value.trim().parse::<u64>().unwrap_or(0);
        }
    }

    saw_record.then(|| ratio_percentage(hit, found))
}

fn text_summary_lines() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Lines\s*:\s*([\d.]+)%").ok())
        .as_ref()
}

/// Line percentage from a text summary such as `Lines : 57.6%`.
#[must_use]
pub fn parse_text_summary(content: &str) -> Option<u32> {
    let caps = text_summary_lines()?.captures(content)?;
    caps[1].parse::<f64>().ok().map(round_percentage)
}

// ============================================================================
// Lint Output
// ============================================================================

/// Error and warning totals from a linter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    pub errors: u32,
    pub warnings: u32,
}

/// Per-file summary in ESLint's JSON formatter output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintFileSummary {
    #[serde(default)]
    error_count: Option<u32>,
    #[serde(default)]
    warning_count: Option<u32>,
}

/// Sum `errorCount` and `warningCount` over ESLint's JSON output.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of file results.
pub fn parse_eslint_json(stdout: &str) -> Result<IssueCounts, serde_json::Error> {
    let files: Vec<EslintFileSummary> = serde_json::from_str(stdout)?;
    Ok(files.iter().fold(IssueCounts::default(), |acc, file| IssueCounts {
        errors: acc.errors.saturating_add(file.error_count.unwrap_or(0)),
        warnings: acc.warnings.saturating_add(file.warning_count.unwrap_or(0)),
    }))
}

/// Count `[ERROR]` and `[WARN]` markers in build-tool output.
#[must_use]
pub fn count_build_markers(output: &str) -> IssueCounts {
    IssueCounts {
        errors: count_occurrences(output, "[ERROR]"),
        warnings: count_occurrences(output, "[WARN]"),
    }
}

fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    u32::try_from(haystack.matches(needle).count()).unwrap_or(u32::MAX)
}

// ============================================================================
// Type Checker Output
// ============================================================================

fn tsc_error_code() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"error TS\d+:").ok()).as_ref()
}

/// Count `error TS<code>:` markers in TypeScript compiler output.
#[must_use]
pub fn count_tsc_errors(output: &str) -> u32 {
    let count = tsc_error_code().map_or(0, |re| re.find_iter(output).count());
    u32::try_from(count).unwrap_or(u32::MAX)
}
