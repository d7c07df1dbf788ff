//! Quality checks and their orchestration.
//!
//! - [`coverage`] - Coverage report threshold check
//! - [`lint`] - ESLint check for Node.js projects
//! - [`typecheck`] - TypeScript `--noEmit` check
//! - [`java`] - Checkstyle and compile checks through Maven/Gradle
//! - [`parser`] - Tool output parsers
//! - [`process`] - External command execution
//! - [`orchestrator`] - Concurrent execution of the three gates
//!
//! # Architecture
//!
//! ```text
//!                 ┌────────────────────┐
//!                 │  GateOrchestrator  │
//!                 │   run_checks()     │
//!                 └─────────┬──────────┘
//!           ┌───────────────┼────────────────┐
//!           ▼               ▼                ▼
//!    ┌────────────┐  ┌─────────────┐  ┌──────────────┐
//!    │  Coverage  │  │ ESLint  or  │  │ tsc  or      │
//!    │  Checker   │  │ Checkstyle  │  │ compile stub │
//!    └────────────┘  └─────────────┘  └──────────────┘
//!           │               │                │
//!           └───────────────┼────────────────┘
//!                           ▼
//!                 QualityCheckResults
//! ```
//!
//! # Gates
//!
//! | Project type | Coverage | Lint | Type check |
//! |--------------|----------|------|------------|
//! | `nodejs` | report vs threshold | `npx eslint` | `npx tsc --noEmit` |
//! | `java` / `springboot` | report vs threshold | `mvn checkstyle:check` / `gradle check` | compile-time (optional compile) |

pub mod coverage;
pub mod java;
pub mod lint;
pub mod orchestrator;
pub mod parser;
pub mod process;
pub mod results;
pub mod typecheck;

pub use coverage::{check_coverage, CoverageChecker, DEFAULT_COVERAGE_THRESHOLD};
pub use java::{check_java_compilation, check_java_linting, BuildTool, JavaChecker};
pub use lint::{check_linting, EslintChecker};
pub use orchestrator::{CheckPlan, GateOrchestrator};
pub use process::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use results::{
    CompileResult, CoverageResult, LintResult, QualityCheckResults, TypeCheckResult,
};
pub use typecheck::{check_types, TscChecker};
