//! Concurrent dependency installation
//!
//! The primary package manager is picked once per run: the alternate (yarn)
//! when its version probe succeeds cleanly, the fallback (npm) otherwise.
//! A secondary manager (bower) runs alongside it when the template ships its
//! manifest. All jobs are joined before returning; a failed job is a warning
//! for the operator, never an error for the scaffold.

use crate::config::InstallConfig;
use futures_util::future::join_all;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Which dependency system a job serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallTool {
    Primary,
    Secondary,
}

/// Lifecycle of an install job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

/// One package-manager invocation against the project directory
#[derive(Debug, Clone)]
pub struct InstallJob {
    pub tool: InstallTool,
    pub program: String,
    pub args: Vec<String>,
    pub working_directory: PathBuf,
    pub status: JobStatus,
}

impl InstallJob {
    pub fn new(
        tool: InstallTool,
        program: impl Into<String>,
        args: Vec<String>,
        working_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tool,
            program: program.into(),
            args,
            working_directory: working_directory.into(),
            status: JobStatus::Pending,
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for InstallJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_line())
    }
}

/// Terminal state of every job of one run
#[derive(Debug, Default)]
pub struct InstallReport {
    pub jobs: Vec<InstallJob>,
}

impl InstallReport {
    pub fn failures(&self) -> impl Iterator<Item = (&InstallJob, &str)> {
        self.jobs.iter().filter_map(|job| match &job.status {
            JobStatus::Failed(reason) => Some((job, reason.as_str())),
            _ => None,
        })
    }

    pub fn all_succeeded(&self) -> bool {
        self.jobs.iter().all(|job| job.status == JobStatus::Succeeded)
    }
}

/// Pick the primary package manager.
///
/// The alternate wins only if `<alternate> --version` exits successfully
/// without writing to stderr.
pub async fn select_primary(settings: &InstallConfig) -> String {
    debug!("Probing {} --version", settings.alternate);

    let probe = Command::new(&settings.alternate)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match probe {
        Ok(output) if output.status.success() && is_blank(&output.stderr) => {
            info!("Selecting {}", settings.alternate);
            settings.alternate.clone()
        }
        Ok(output) => {
            debug!("{} probe exited with {}", settings.alternate, output.status);
            settings.fallback.clone()
        }
        Err(e) => {
            debug!("{} probe failed: {}", settings.alternate, e);
            settings.fallback.clone()
        }
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Jobs for `project`: the primary manager, plus the secondary one when its
/// manifest is present
pub fn plan_jobs(settings: &InstallConfig, project: &Path, primary: &str) -> Vec<InstallJob> {
    let mut jobs = vec![InstallJob::new(
        InstallTool::Primary,
        primary,
        settings.args.clone(),
        project,
    )];

    if !settings.secondary.is_empty()
        && !settings.secondary_manifest.is_empty()
        && project.join(&settings.secondary_manifest).is_file()
    {
        jobs.push(InstallJob::new(
            InstallTool::Secondary,
            &settings.secondary,
            settings.secondary_args.clone(),
            project,
        ));
    }

    jobs
}

/// Run every job concurrently and wait for all of them
pub async fn install(jobs: Vec<InstallJob>, timeout: Option<Duration>) -> InstallReport {
    let runs = jobs.into_iter().map(|job| run_job(job, timeout));
    InstallReport {
        jobs: join_all(runs).await,
    }
}

/// Run one job to a terminal status
pub async fn run_job(mut job: InstallJob, timeout: Option<Duration>) -> InstallJob {
    debug!(
        "Running {} in {}",
        job.command_line(),
        job.working_directory.display()
    );

    let child = Command::new(&job.program)
        .args(&job.args)
        .current_dir(&job.working_directory)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let child = match child {
        Ok(child) => child,
        Err(e) => {
            job.status = JobStatus::Failed(format!("could not start {}: {}", job.program, e));
            return job;
        }
    };
    job.status = JobStatus::Running;

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(result) => result,
            Err(_) => {
                // Dropping the future drops the child, which kills it
                job.status = JobStatus::Failed(format!("timed out after {:?}", limit));
                return job;
            }
        },
        None => child.wait_with_output().await,
    };

    job.status = match output {
        Err(e) => JobStatus::Failed(format!("waiting for {}: {}", job.program, e)),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !output.status.success() {
                match significant_stderr(&stderr) {
                    Some(detail) => JobStatus::Failed(format!("{}: {}", output.status, detail)),
                    None => JobStatus::Failed(output.status.to_string()),
                }
            } else if let Some(detail) = significant_stderr(&stderr) {
                JobStatus::Failed(detail)
            } else {
                JobStatus::Succeeded
            }
        }
    };

    debug!("{} finished: {:?}", job.command_line(), job.status);
    job
}

/// Stderr lines that are not package-manager warnings, joined.
///
/// npm and yarn print deprecation notices prefixed with `warning` or
/// `npm WARN`; those alone do not make a run fail.
pub fn significant_stderr(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let lower = line.to_ascii_lowercase();
            !lower.starts_with("warning") && !lower.starts_with("npm warn")
        })
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}
