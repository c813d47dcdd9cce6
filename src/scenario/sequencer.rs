//! Scenario sequencer
//!
//! Runs a scenario's stages strictly in declared order, aborting at the first
//! failure. Stages are not independent: an earlier stage produces the
//! artifacts later stages consume, so once one fails the rest have no valid
//! input and must not run. The declared cleanup paths are removed on every
//! exit path so a failed scenario cannot contaminate the next one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::Colorize;
use serde::Serialize;
use tracing::{debug, warn};

use crate::common::{Config, Error, Result};
use crate::exec;
use crate::parse::{ProbeRecord, RunSummary};
use crate::scenario::config::{
    Scenario, Stage, StageExpectation, StepExpectation, ValueExpectation,
};
use crate::{check, parse};

/// Options shared by every scenario in one harness invocation
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Skip cleanup so a failed scenario's artifacts can be inspected
    pub keep_artifacts: bool,
    /// Echo command lines and failure output
    pub verbose: bool,
    /// Harness configuration (tool overrides, default timeout)
    pub config: Config,
}

/// Execution state of the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// No stage has started
    Pending,
    /// The indexed stage is executing
    Running(usize),
    /// Terminal: the indexed stage failed, later stages were skipped
    StageFailed(usize),
    /// Terminal: every stage passed
    Completed,
}

/// Result of one stage
#[derive(Debug, Serialize)]
pub struct StageResult {
    /// Stage name
    pub name: String,
    /// Whether the stage passed
    pub passed: bool,
    /// Failure diagnostic (failing command line or field mismatch)
    pub detail: Option<String>,
}

/// Terminal outcome of one scenario, the only long-lived artifact of a run
#[derive(Debug, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub scenario: String,
    /// Results for exactly the stages that ran, in order
    pub stages: Vec<StageResult>,
    /// Whether every declared stage ran and passed
    pub passed: bool,
}

/// Drives one scenario through its stages
pub struct Sequencer<'a> {
    scenario: &'a Scenario,
    dir: PathBuf,
    options: &'a RunOptions,
    state: SequencerState,
}

impl<'a> Sequencer<'a> {
    pub fn new(scenario: &'a Scenario, dir: PathBuf, options: &'a RunOptions) -> Self {
        Self {
            scenario,
            dir,
            options,
            state: SequencerState::Pending,
        }
    }

    /// Current state, terminal after `run` returns
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Execute the scenario's stages in order, then clean up
    pub async fn run(&mut self) -> ScenarioOutcome {
        println!(
            "\n{} {}",
            "Running Scenario:".blue().bold(),
            self.scenario.name.white().bold()
        );
        if let Some(desc) = &self.scenario.description {
            println!("  {}", desc.dimmed());
        }

        let mut stages = Vec::new();
        let mut failed = false;

        for (i, stage) in self.scenario.stages.iter().enumerate() {
            self.state = SequencerState::Running(i);
            if self.options.verbose {
                println!("  $ {}", stage.command.dimmed());
            }

            match self.run_stage(stage).await {
                Ok(()) => {
                    println!("  {} {} {}", "✓".green(), stage.name, stage.command.dimmed());
                    stages.push(StageResult {
                        name: stage.name.clone(),
                        passed: true,
                        detail: None,
                    });
                }
                Err(e) => {
                    println!("  {} {}: {}", "✗".red(), stage.name, e);
                    stages.push(StageResult {
                        name: stage.name.clone(),
                        passed: false,
                        detail: Some(e.to_string()),
                    });
                    self.state = SequencerState::StageFailed(i);
                    failed = true;
                    break;
                }
            }
        }

        if !failed {
            self.state = SequencerState::Completed;
        }

        // Release the scenario's filesystem footprint on both exit paths.
        if self.options.keep_artifacts {
            debug!(scenario = %self.scenario.name, "--keep set, skipping cleanup");
        } else {
            self.cleanup();
        }

        let passed = !failed;
        if passed {
            println!("{} {}", "✓".green().bold(), "Scenario Passed".green().bold());
        } else {
            println!("{} {}", "✗".red().bold(), "Scenario Failed".red().bold());
        }

        ScenarioOutcome {
            scenario: self.scenario.name.clone(),
            stages,
            passed,
        }
    }

    /// Execute one stage: spawn, gate on exit code, check artifacts, validate
    async fn run_stage(&self, stage: &Stage) -> Result<()> {
        let argv = stage.argv()?;
        let program = self.options.config.resolve_tool(&argv[0]);
        let timeout = Duration::from_secs(
            stage
                .timeout_secs
                .unwrap_or(self.options.config.timeouts.stage_default_secs),
        );

        let result =
            exec::run(&program, &argv[1..], &self.dir, stage.capture, timeout).await?;

        if result.exit_code != 0 {
            if self.options.verbose && !result.stderr.is_empty() {
                eprintln!("{}", result.stderr.trim_end());
            }
            return Err(Error::StageCommandFailed {
                command: stage.command.clone(),
                exit_code: result.exit_code,
            });
        }

        for artifact in &stage.artifacts {
            if !self.dir.join(artifact).exists() {
                return Err(Error::MissingArtifact {
                    path: artifact.display().to_string(),
                });
            }
        }

        if let Some(expect) = &stage.expect {
            match expect {
                StageExpectation::RunSummary {
                    stop_reason_prefix,
                    final_step,
                    final_time,
                } => check_run_summary(
                    &result.stdout,
                    stop_reason_prefix.as_deref(),
                    final_step.as_ref(),
                    final_time.as_ref(),
                )?,
                StageExpectation::Probe { point, fields } => {
                    let record = ProbeRecord::parse(&result.stdout)?;
                    for field in fields {
                        let observed = record.field(*point, &field.field)?;
                        field.check(observed)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Remove the declared cleanup paths, best effort
    fn cleanup(&self) {
        for path in &self.scenario.cleanup {
            let target = self.dir.join(path);
            if !target.exists() {
                continue;
            }
            let removed = if target.is_dir() {
                std::fs::remove_dir_all(&target)
            } else {
                std::fs::remove_file(&target)
            };
            if let Err(e) = removed {
                warn!(path = %target.display(), error = %e, "cleanup failed");
            }
        }
    }
}

/// Validate free-form run output against its declared bounds
fn check_run_summary(
    stdout: &str,
    stop_reason_prefix: Option<&str>,
    final_step: Option<&StepExpectation>,
    final_time: Option<&ValueExpectation>,
) -> Result<()> {
    let summary = RunSummary::parse(stdout);

    if let Some(prefix) = stop_reason_prefix {
        let reason = summary
            .stop_reason
            .as_deref()
            .ok_or_else(|| Error::absent(parse::metrics::STOP_REASON))?;
        if !reason.starts_with(prefix) {
            return Err(Error::Expectation(format!(
                "STOP-REASON mismatch: expected prefix '{prefix}', got '{reason}'"
            )));
        }
    }

    if let Some(bound) = final_step {
        let steps = summary
            .final_step
            .ok_or_else(|| Error::absent(parse::metrics::FINAL_STEP))?;
        if !check::within_absolute(steps, bound.expected, bound.max_delta) {
            return Err(Error::Expectation(format!(
                "FINAL-STEP mismatch: expected {}±{}, got {}",
                bound.expected, bound.max_delta, steps
            )));
        }
    }

    if let Some(bound) = final_time {
        let t = summary
            .final_time
            .ok_or_else(|| Error::absent(parse::metrics::FINAL_TIME))?;
        if !check::within_relative(t, bound.expected, bound.rel_tol, bound.floor) {
            return Err(Error::Expectation(format!(
                "FINAL-TIME mismatch: expected {} (rel tol {}, floor {}), got {}",
                bound.expected, bound.rel_tol, bound.floor, t
            )));
        }
    }

    Ok(())
}

/// Load a scenario file and run it to a terminal outcome
///
/// Load/validation problems are returned as errors; the caller decides how to
/// fold them into the suite result. Once execution starts every failure is
/// recorded in the outcome instead.
pub async fn run_scenario(path: &Path, options: &RunOptions) -> Result<ScenarioOutcome> {
    let scenario = Scenario::load(path)?;
    let dir = scenario.working_dir(path);
    if !dir.is_dir() {
        return Err(Error::Scenario(format!(
            "working directory '{}' does not exist",
            dir.display()
        )));
    }
    let mut sequencer = Sequencer::new(&scenario, dir, options);
    Ok(sequencer.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_run_summary_happy_path() {
        let stdout = "STOP-REASON maximum-time 5.000e-04\nFINAL-STEP 435\nFINAL-TIME 0.0005\n";
        check_run_summary(
            stdout,
            Some("maximum-time"),
            Some(&StepExpectation {
                expected: 435,
                max_delta: 5,
            }),
            Some(&ValueExpectation {
                expected: 0.0005,
                rel_tol: 0.01,
                floor: 1.0,
            }),
        )
        .unwrap();
    }

    #[test]
    fn test_check_run_summary_wrong_stop_reason() {
        let stdout = "STOP-REASON diverged at step 12\nFINAL-STEP 12\nFINAL-TIME 1e-5\n";
        let err = check_run_summary(stdout, Some("maximum-time"), None, None).unwrap_err();
        assert!(err.to_string().contains("STOP-REASON mismatch"));
    }

    #[test]
    fn test_check_run_summary_absent_marker_fails_expectation() {
        let err = check_run_summary(
            "no markers here\n",
            None,
            Some(&StepExpectation {
                expected: 435,
                max_delta: 5,
            }),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("absent from output"));
    }

    #[test]
    fn test_check_run_summary_time_drift_rejected_with_zero_floor() {
        let stdout = "FINAL-TIME 0.005\n";
        let err = check_run_summary(
            stdout,
            None,
            None,
            Some(&ValueExpectation {
                expected: 0.0005,
                rel_tol: 0.01,
                floor: 0.0,
            }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("FINAL-TIME mismatch"));
    }

    #[test]
    fn test_check_run_summary_step_drift_rejected() {
        let stdout = "FINAL-STEP 443\n";
        let err = check_run_summary(
            stdout,
            None,
            Some(&StepExpectation {
                expected: 435,
                max_delta: 5,
            }),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("FINAL-STEP mismatch"));
    }
}
