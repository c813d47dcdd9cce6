//! CLI command handling
//!
//! Dispatches CLI commands and turns the aggregate scenario results into the
//! harness exit code: any failed stage or expectation makes the whole
//! invocation fail.

use std::path::PathBuf;

use colored::Colorize;

use crate::commands::Commands;
use crate::common::{config::Config, paths, Error, Result};
use crate::scenario::{self, RunOptions, Scenario, ScenarioOutcome, StageResult};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            scenarios,
            json,
            keep,
            verbose,
        } => run(scenarios, json, keep, verbose).await,

        Commands::Validate { scenarios } => validate(&scenarios),

        Commands::ConfigPath => {
            match paths::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("(no platform configuration directory available)"),
            }
            Ok(())
        }
    }
}

/// Run each scenario file in order and summarize
///
/// One scenario failing does not stop the remaining files: independent
/// scenarios should all be attempted so a single regression does not hide
/// others. Ordering between dependent stages lives inside a scenario file.
async fn run(scenarios: Vec<PathBuf>, json: bool, keep: bool, verbose: bool) -> Result<()> {
    let options = RunOptions {
        keep_artifacts: keep,
        verbose,
        config: Config::load()?,
    };

    let mut outcomes = Vec::new();
    for path in &scenarios {
        match scenario::run_scenario(path, &options).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                // The file never reached execution; report it as a failed
                // scenario so the suite result reflects it.
                println!(
                    "\n{} {}: {}",
                    "✗".red().bold(),
                    path.display().to_string().white().bold(),
                    e
                );
                outcomes.push(ScenarioOutcome {
                    scenario: path.display().to_string(),
                    stages: vec![StageResult {
                        name: "load".to_string(),
                        passed: false,
                        detail: Some(e.to_string()),
                    }],
                    passed: false,
                });
            }
        }
    }

    let total = outcomes.len();
    let failed = outcomes.iter().filter(|o| !o.passed).count();

    println!();
    if failed == 0 {
        println!(
            "{}",
            format!("{total} scenario(s) passed").green().bold()
        );
    } else {
        println!(
            "{}",
            format!("{failed} of {total} scenario(s) failed").red().bold()
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    }

    if failed > 0 {
        return Err(Error::ScenariosFailed { failed, total });
    }
    Ok(())
}

/// Check scenario files without executing anything
fn validate(scenarios: &[PathBuf]) -> Result<()> {
    let mut invalid = 0;
    for path in scenarios {
        match Scenario::load(path) {
            Ok(scenario) => println!(
                "{} {} ({} stages)",
                "✓".green(),
                path.display(),
                scenario.stages.len()
            ),
            Err(e) => {
                println!("{} {}: {}", "✗".red(), path.display(), e);
                invalid += 1;
            }
        }
    }
    if invalid > 0 {
        return Err(Error::ScenariosFailed {
            failed: invalid,
            total: scenarios.len(),
        });
    }
    Ok(())
}
