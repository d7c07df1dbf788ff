//! Testing infrastructure.
//!
//! Test doubles for the two external seams of a run: running tools
//! ([`CommandRunner`](crate::quality::process::CommandRunner)) and publishing
//! results ([`Reporter`](crate::reporting::Reporter)).

pub mod mocks;

pub use mocks::{MockCommandRunner, RecordingReporter};
