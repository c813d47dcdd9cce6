//! Scenario loading and sequencing
//!
//! A scenario is authored as YAML and executed as an ordered, abort-on-first-
//! failure pipeline of external commands with attached validations.

mod config;
mod sequencer;

pub use config::*;
pub use sequencer::{
    run_scenario, RunOptions, ScenarioOutcome, Sequencer, SequencerState, StageResult,
};
