//! simcheck - acceptance-test harness for external flow-solver pipelines
//!
//! Drives an external numerical-simulation tool through ordered command
//! pipelines, parses its textual and structured output, and checks the
//! resulting physical quantities against analytic reference values within
//! tolerance.

pub mod check;
pub mod cli;
pub mod commands;
pub mod common;
pub mod exec;
pub mod parse;
pub mod scenario;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use scenario::{run_scenario, RunOptions, Scenario, ScenarioOutcome, SequencerState};
