//! Synchronous-to-completion execution of one external command
//!
//! Every invocation runs in an explicitly supplied working directory. The
//! pipelines create and delete relative-path artifacts, so a wrong working
//! directory would silently corrupt another scenario's state.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::common::{Error, Result};

/// Captured outcome of one external command
#[derive(Debug)]
pub struct ExecutionResult {
    /// Exit code, propagated verbatim (-1 if killed by a signal)
    pub exit_code: i32,
    /// Captured standard output (empty when capture was off)
    pub stdout: String,
    /// Captured standard error (empty when capture was off)
    pub stderr: String,
}

/// Run one command to completion in `cwd`
///
/// When `capture` is false both streams are nulled; stages that only need the
/// exit code skip the buffering. The timeout is wall-clock; on expiry the
/// child is killed and the stage fails the same way a non-zero exit does.
/// No retry on failure: the tool is assumed deterministic and a retry would
/// mask a real regression.
pub async fn run(
    program: &Path,
    args: &[String],
    cwd: &Path,
    capture: bool,
    timeout: Duration,
) -> Result<ExecutionResult> {
    let command_text = display_command(program, args);
    debug!(command = %command_text, cwd = %cwd.display(), "spawning stage command");

    let mut cmd = TokioCommand::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(if capture { Stdio::piped() } else { Stdio::null() })
        .stderr(if capture { Stdio::piped() } else { Stdio::null() })
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| Error::StageSpawnFailed {
        command: command_text.clone(),
        error: e.to_string(),
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output?,
        Err(_) => {
            // kill_on_drop reaps the child when the future above is dropped
            return Err(Error::StageTimeout {
                command: command_text,
                seconds: timeout.as_secs(),
            });
        }
    };

    let exit_code = output.status.code().unwrap_or(-1);
    debug!(command = %command_text, exit_code, "stage command finished");

    Ok(ExecutionResult {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Render a program + args back into a single command line for diagnostics
pub(crate) fn display_command(program: &Path, args: &[String]) -> String {
    let mut text = program.display().to_string();
    for arg in args {
        text.push(' ');
        text.push_str(arg);
    }
    text
}
