//! Mock implementations of the external seams.
//!
//! These mocks provide controllable test doubles for tool invocation and
//! result reporting, enabling deterministic unit tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::quality::process::{CommandOutput, CommandRunner, CommandSpec};
use crate::quality::results::QualityCheckResults;
use crate::reporting::Reporter;

#[derive(Debug, Clone)]
enum MockResponse {
    Output(CommandOutput),
    SpawnError(String),
}

/// Mock implementation of the command runner.
///
/// Responses are matched on the full command line first, then on the program
/// name. Unmatched commands fail to spawn, like a missing tool would.
///
/// # Example
///
/// ```rust,ignore
/// let runner = MockCommandRunner::new()
///     .with_output("npx tsc --noEmit", CommandOutput::ok(""));
///
/// let output = runner.run(&CommandSpec::new("npx", ["tsc", "--noEmit"]), Path::new("."))?;
/// assert!(output.success);
/// assert_eq!(runner.call_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    responses: HashMap<String, MockResponse>,
    available: HashSet<String>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl MockCommandRunner {
    /// Create a new mock with no configured responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `output` for the given command line or program name.
    #[must_use]
    pub fn with_output(mut self, command: &str, output: CommandOutput) -> Self {
        self.responses
            .insert(command.to_string(), MockResponse::Output(output));
        self
    }

    /// Fail to spawn the given command line or program name.
    #[must_use]
    pub fn with_spawn_error(mut self, command: &str, message: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            MockResponse::SpawnError(message.to_string()),
        );
        self
    }

    /// Report `program` as present on `PATH`.
    #[must_use]
    pub fn with_available(mut self, program: &str) -> Self {
        self.available.insert(program.to_string());
        self
    }

    /// Commands run so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of commands run so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, command: &CommandSpec, _working_dir: &Path) -> Result<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }

        let response = self
            .responses
            .get(&command.to_string())
            .or_else(|| self.responses.get(&command.program));

        match response {
            Some(MockResponse::Output(output)) => Ok(output.clone()),
            Some(MockResponse::SpawnError(message)) => bail!("{}", message),
            None => bail!("Command failed: {}: No such file or directory", command),
        }
    }

    fn is_available(&self, program: &str) -> bool {
        self.available.contains(program)
    }
}

/// Reporter that records what it was asked to publish.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    comments: Mutex<Vec<QualityCheckResults>>,
    statuses: Mutex<Vec<QualityCheckResults>>,
    fail_with: Option<String>,
}

impl RecordingReporter {
    /// Create a reporter that accepts every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every reporting call fail with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Results passed to `post_comment`.
    #[must_use]
    pub fn comments(&self) -> Vec<QualityCheckResults> {
        self.comments.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Results passed to `set_check_status`.
    #[must_use]
    pub fn statuses(&self) -> Vec<QualityCheckResults> {
        self.statuses.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(
        &self,
        log: &Mutex<Vec<QualityCheckResults>>,
        results: &QualityCheckResults,
    ) -> crate::Result<()> {
        if let Some(ref message) = self.fail_with {
            return Err(crate::GateError::api("record", 500, message.clone()));
        }
        if let Ok(mut entries) = log.lock() {
            entries.push(results.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl Reporter for RecordingReporter {
    async fn post_comment(&self, results: &QualityCheckResults) -> crate::Result<()> {
        self.record(&self.comments, results)
    }

    async fn set_check_status(&self, results: &QualityCheckResults) -> crate::Result<()> {
        self.record(&self.statuses, results)
    }
}
