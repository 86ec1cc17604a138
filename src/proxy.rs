//! Forwarding project commands to the task runner

use crate::error::{RocketyError, RocketyResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Fail unless every marker file exists in `dir`
pub fn ensure_project_dir(dir: &Path, markers: &[String]) -> RocketyResult<()> {
    if markers.iter().all(|marker| dir.join(marker).is_file()) {
        Ok(())
    } else {
        Err(RocketyError::NotAProject(dir.to_path_buf()))
    }
}

/// Whether `command` may only run inside a project directory.
///
/// Listing tasks is left to the runner, which reports a missing gulpfile itself.
pub fn requires_project(command: &[String]) -> bool {
    !matches!(command, [only] if only == "tasks")
}

/// Runner arguments for a user-level command.
///
/// `tasks` lists the runner's tasks; anything else is passed through as is.
pub fn runner_args(command: &[String]) -> Vec<String> {
    match command {
        [only] if only == "tasks" => vec!["--tasks".to_string()],
        other => other.to_vec(),
    }
}

/// Run `runner` with `args` in `cwd`, attached to this terminal.
///
/// Returns the runner's exit code, or -1 when it was killed by a signal.
pub async fn forward(runner: &str, args: &[String], cwd: &Path) -> RocketyResult<i32> {
    debug!("Executing interactively: {} {:?}", runner, args);

    let status = Command::new(runner)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| RocketyError::command_failed(format!("{} {}", runner, args.join(" ")), e))?;

    Ok(status.code().unwrap_or(-1))
}
