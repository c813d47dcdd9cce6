//! Scenario configuration types
//!
//! Defines the data structures for deserializing YAML scenarios. A scenario
//! is one ordered pipeline (setup -> compute -> export -> probe) validating a
//! single configuration variant; variants share the schema and differ only in
//! commands and expected values. Everything here is authored configuration,
//! immutable once loaded.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::check;
use crate::common::{Error, Result};

/// A complete scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct Scenario {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Working directory for every stage, relative to the scenario file
    /// (default: the scenario file's own directory)
    pub dir: Option<PathBuf>,
    /// The ordered stages; execution aborts at the first failure
    pub stages: Vec<Stage>,
    /// Paths (relative to the working directory) removed after the scenario
    /// on every exit path, success or failure
    #[serde(default)]
    pub cleanup: Vec<PathBuf>,
}

/// One ordered unit of a scenario: a single external command plus its checks
#[derive(Deserialize, Debug)]
pub struct Stage {
    /// Unique name within the scenario
    pub name: String,
    /// Command line, split on whitespace into argv
    pub command: String,
    /// Capture stdout/stderr (default true); stages that only need the exit
    /// code can turn this off
    #[serde(default = "default_capture")]
    pub capture: bool,
    /// Wall-clock timeout for this stage in seconds (default: harness config)
    pub timeout_secs: Option<u64>,
    /// Paths that must exist after the stage succeeds
    #[serde(default)]
    pub artifacts: Vec<PathBuf>,
    /// Optional validation applied to the captured stdout
    pub expect: Option<StageExpectation>,
}

fn default_capture() -> bool {
    true
}

/// Validation attached to a stage, selected by output contract
#[derive(Deserialize, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageExpectation {
    /// Marker scan of free-form run output
    RunSummary {
        /// Required prefix of the STOP-REASON value (normal termination)
        stop_reason_prefix: Option<String>,
        /// Bound on the FINAL-STEP count
        final_step: Option<StepExpectation>,
        /// Bound on the FINAL-TIME value
        final_time: Option<ValueExpectation>,
    },
    /// Structured point-query response
    Probe {
        /// Point index within the response (0 for a single-point query)
        #[serde(default)]
        point: usize,
        /// Field expectations, all of which must hold
        fields: Vec<FieldExpectation>,
    },
}

/// Absolute bound on an integer-valued quantity
#[derive(Deserialize, Debug)]
pub struct StepExpectation {
    /// Expected step count
    pub expected: i64,
    /// Allowed absolute difference (strict bound)
    #[serde(default = "default_step_delta")]
    pub max_delta: i64,
}

fn default_step_delta() -> i64 {
    5
}

/// Relative bound (with floor) on a float quantity without a field name
#[derive(Deserialize, Debug)]
pub struct ValueExpectation {
    /// Expected value
    pub expected: f64,
    /// Relative tolerance
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,
    /// Additive floor in the relative-error denominator
    #[serde(default = "default_floor")]
    pub floor: f64,
}

/// Expected value for one named probe field
#[derive(Deserialize, Debug)]
pub struct FieldExpectation {
    /// Field name as reported by the probe (e.g. "rho", "vel.x")
    pub field: String,
    /// Expected value, typically from an analytic solution
    pub expected: f64,
    /// Relative tolerance
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,
    /// Additive floor in the relative-error denominator
    #[serde(default = "default_floor")]
    pub floor: f64,
}

fn default_rel_tol() -> f64 {
    check::DEFAULT_REL_TOL
}

fn default_floor() -> f64 {
    check::DEFAULT_FLOOR
}

impl FieldExpectation {
    /// Check one observed value against this expectation
    pub fn check(&self, observed: f64) -> Result<()> {
        if check::within_relative(observed, self.expected, self.rel_tol, self.floor) {
            Ok(())
        } else {
            Err(Error::Expectation(format!(
                "{} mismatch: expected {}, got {} (rel err {:.4}, bound {})",
                self.field,
                self.expected,
                observed,
                check::relative_error(observed, self.expected, self.floor),
                self.rel_tol
            )))
        }
    }
}

impl Stage {
    /// Split the command line into argv tokens
    pub fn argv(&self) -> Result<Vec<String>> {
        let argv: Vec<String> = self.command.split_whitespace().map(String::from).collect();
        if argv.is_empty() {
            return Err(Error::Scenario(format!(
                "stage '{}' has an empty command",
                self.name
            )));
        }
        Ok(argv)
    }
}

impl Scenario {
    /// Load and validate a scenario from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        let scenario: Scenario = serde_yaml::from_str(&content)
            .map_err(|e| Error::Scenario(format!("{}: {e}", path.display())))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Structural validation: at least one stage, unique names, real commands
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(Error::Scenario(format!(
                "scenario '{}' declares no stages",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.name.as_str()) {
                return Err(Error::Scenario(format!(
                    "duplicate stage name '{}' in scenario '{}'",
                    stage.name, self.name
                )));
            }
            stage.argv()?;
        }
        Ok(())
    }

    /// Resolve the working directory for this scenario's stages
    pub fn working_dir(&self, scenario_path: &Path) -> PathBuf {
        let base = scenario_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        match &self.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => base.join(dir),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_YAML: &str = "\
name: shock-tube-static-profile
description: InFlowBC_StaticProfile variant
stages:
  - name: prep-gas
    command: lmr prep-gas -i ideal-air.lua -o ideal-air.gas
    capture: false
  - name: run
    command: lmr run
    expect:
      kind: run_summary
      stop_reason_prefix: maximum-time
      final_step: { expected: 435 }
      final_time: { expected: 0.0005, rel_tol: 0.01 }
  - name: snapshot
    command: lmr snapshot2vtk --all
    artifacts: [lmrsim/vtk]
  - name: probe-post-shock
    command: lmr probe-flow --names=rho,p --location=0.90,0.025,0.0
    expect:
      kind: probe
      fields:
        - { field: rho, expected: 0.0417124 }
        - { field: p, expected: 7152.19 }
cleanup: [lmrsim, ideal-air.gas]
";

    #[test]
    fn test_deserialize_full_scenario() {
        let scenario: Scenario = serde_yaml::from_str(SCENARIO_YAML).unwrap();
        scenario.validate().unwrap();
        assert_eq!(scenario.stages.len(), 4);
        assert!(!scenario.stages[0].capture);
        assert!(scenario.stages[1].capture);
        assert_eq!(scenario.cleanup.len(), 2);
        match scenario.stages[1].expect.as_ref().unwrap() {
            StageExpectation::RunSummary {
                stop_reason_prefix,
                final_step,
                final_time,
            } => {
                assert_eq!(stop_reason_prefix.as_deref(), Some("maximum-time"));
                assert_eq!(final_step.as_ref().unwrap().max_delta, 5);
                assert_eq!(final_time.as_ref().unwrap().floor, 1.0);
            }
            other => panic!("unexpected expectation: {other:?}"),
        }
    }

    #[test]
    fn test_probe_expectation_defaults() {
        let scenario: Scenario = serde_yaml::from_str(SCENARIO_YAML).unwrap();
        match scenario.stages[3].expect.as_ref().unwrap() {
            StageExpectation::Probe { point, fields } => {
                assert_eq!(*point, 0);
                assert_eq!(fields[0].rel_tol, 0.01);
                assert_eq!(fields[0].floor, 1.0);
            }
            other => panic!("unexpected expectation: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_stage_names_rejected() {
        let yaml = "\
name: dup
stages:
  - { name: run, command: lmr run }
  - { name: run, command: lmr run }
";
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate stage name"));
    }

    #[test]
    fn test_empty_command_rejected() {
        let yaml = "\
name: empty
stages:
  - { name: run, command: '   ' }
";
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_no_stages_rejected() {
        let yaml = "name: bare\nstages: []\n";
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_field_expectation_diagnostic_names_field() {
        let exp = FieldExpectation {
            field: "p".to_string(),
            expected: 7152.19,
            rel_tol: 0.01,
            floor: 1.0,
        };
        assert!(exp.check(7152.19).is_ok());
        let err = exp.check(7300.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("p mismatch"));
        assert!(msg.contains("7300"));
    }

    #[test]
    fn test_working_dir_defaults_to_scenario_parent() {
        let scenario: Scenario = serde_yaml::from_str(SCENARIO_YAML).unwrap();
        let dir = scenario.working_dir(Path::new("/suite/a/scenario.yaml"));
        assert_eq!(dir, PathBuf::from("/suite/a"));
    }
}
