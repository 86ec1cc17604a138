//! Placing a release tree at the requested destination
//!
//! The tree is assembled in a hidden directory next to the destination and
//! renamed into place in one step, so an interrupted run never leaves a
//! half-written project behind.

use crate::config::OnExisting;
use crate::error::{RocketyError, RocketyResult};
use crate::paths::{self, PathState};
use crate::ui::{self, UiContext};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A validated `create` invocation
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub project_name: String,
    pub destination: PathBuf,
    pub development_mode: bool,
    pub skip_version_check: bool,
    pub on_existing: OnExisting,
}

impl ScaffoldRequest {
    /// Validate the project name and resolve the destination against `cwd`
    pub fn new(
        project_name: Option<&str>,
        cwd: &Path,
        development_mode: bool,
        skip_version_check: bool,
        on_existing: OnExisting,
    ) -> RocketyResult<Self> {
        let name = project_name.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(RocketyError::validation("Project name is required!"));
        }
        if Path::new(name).file_name().is_none() || name.contains('\0') {
            return Err(RocketyError::validation(format!(
                "{:?} is not a valid project name",
                name
            )));
        }

        Ok(Self {
            project_name: name.to_string(),
            destination: cwd.join(name),
            development_mode,
            skip_version_check,
            on_existing,
        })
    }
}

/// How an existing destination is handled once placement starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Destination does not exist
    None,
    /// Destination is a directory the caller agreed to replace
    Replace,
}

/// How the source tree reaches the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Scratch extraction: ownership moves to the destination
    Move,
    /// Shared cache entry: copied so the entry stays valid
    Copy,
}

/// Check the destination before any side effect.
///
/// A regular file is always refused. An existing directory follows
/// `request.on_existing`; a declined prompt is a validation error.
pub async fn validate_destination(
    request: &ScaffoldRequest,
    ctx: &UiContext,
) -> RocketyResult<Collision> {
    let destination = &request.destination;

    match PathState::of(destination)? {
        PathState::Absent => Ok(Collision::None),
        PathState::File => Err(RocketyError::validation(format!(
            "{} already exists and is not a directory",
            destination.display()
        ))),
        PathState::Directory => match request.on_existing {
            OnExisting::Overwrite => {
                debug!("Replacing existing {}", destination.display());
                Ok(Collision::Replace)
            }
            OnExisting::Fail => Err(RocketyError::validation(format!(
                "{} already exists",
                destination.display()
            ))),
            OnExisting::Prompt => {
                let question = format!(
                    "{} already exists. Do you want to replace it?",
                    destination.display()
                );
                if ui::confirm(ctx, &question, false).await? {
                    Ok(Collision::Replace)
                } else {
                    Err(RocketyError::validation(format!(
                        "{} already exists",
                        destination.display()
                    )))
                }
            }
        },
    }
}

/// Place `source` at `destination` atomically
pub fn materialize(
    source: &Path,
    destination: &Path,
    placement: Placement,
    collision: Collision,
) -> RocketyResult<()> {
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .map_err(|e| RocketyError::io(format!("creating {}", parent.display()), e))?;

    let staging = tempfile::Builder::new()
        .prefix(".rockety-")
        .tempdir_in(&parent)
        .map_err(|e| {
            RocketyError::io(format!("creating staging directory in {}", parent.display()), e)
        })?;
    let staged = staging.path().join("tree");

    match placement {
        Placement::Move => paths::move_tree(source, &staged)?,
        Placement::Copy => {
            paths::copy_tree(source, &staged)?;
        }
    }

    match (collision, PathState::of(destination)?) {
        (_, PathState::Absent) => {}
        (Collision::Replace, PathState::Directory) => {
            fs::remove_dir_all(destination).map_err(|e| {
                RocketyError::io(format!("removing existing {}", destination.display()), e)
            })?;
        }
        // Something appeared after validation
        _ => {
            return Err(RocketyError::validation(format!(
                "{} already exists",
                destination.display()
            )))
        }
    }

    fs::rename(&staged, destination).map_err(|e| {
        RocketyError::io(format!("moving project into {}", destination.display()), e)
    })?;

    info!("Project placed at {}", destination.display());
    Ok(())
}

/// A template file that could not be removed
#[derive(Debug)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Remove template-only files from a fresh project.
///
/// Each path is handled independently; missing paths are skipped and
/// failures are returned rather than aborting.
pub fn remove_template_files(project: &Path, patterns: &[String]) -> Vec<CleanupFailure> {
    let mut failures = Vec::new();

    for pattern in patterns {
        let path = project.join(pattern);
        let result = match PathState::of(&path) {
            Ok(PathState::Absent) => continue,
            Ok(PathState::Directory) => fs::remove_dir_all(&path),
            Ok(PathState::File) => fs::remove_file(&path),
            Err(e) => {
                failures.push(CleanupFailure {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match result {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) => {
                warn!("Could not remove {}: {}", path.display(), e);
                failures.push(CleanupFailure {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    failures
}
