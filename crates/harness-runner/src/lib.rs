//! # harness-runner
//!
//! Runs the fixed, ordered sequence of checks against a chat service and
//! collects a report. A failing case never stops the cases after it.

pub mod cases;
pub mod report;
pub mod runner;

pub use cases::{Case, CaseOutcome};
pub use report::{CaseResult, RunReport};
pub use runner::TestRunner;
