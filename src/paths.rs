//! Filesystem helpers shared by the release cache and the materializer

use crate::error::{RocketyError, RocketyResult};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// What currently occupies a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// Nothing exists at the path
    Absent,
    /// A regular file (or anything that is not a directory)
    File,
    /// A directory, or a symlink to one
    Directory,
}

impl PathState {
    /// Inspect a path without treating "not found" as an error
    pub fn of(path: &Path) -> RocketyResult<Self> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Self::Directory),
            Ok(_) => Ok(Self::File),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::Absent),
            Err(e) => Err(RocketyError::io(format!("inspecting {}", path.display()), e)),
        }
    }
}

/// Recursively copy `src` to `dst`, preserving file modes and symlinks.
///
/// `dst` must not exist yet. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> RocketyResult<u64> {
    let mut files = 0;

    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|e| {
            RocketyError::io(format!("walking {}", src.display()), io::Error::other(e))
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| RocketyError::Internal(format!("walkdir escaped its root: {}", e)))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| RocketyError::io(format!("creating {}", target.display()), e))?;
            let perms = entry
                .metadata()
                .map_err(|e| {
                    RocketyError::io(
                        format!("reading metadata of {}", entry.path().display()),
                        io::Error::other(e),
                    )
                })?
                .permissions();
            fs::set_permissions(&target, perms).map_err(|e| {
                RocketyError::io(format!("setting permissions on {}", target.display()), e)
            })?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            files += 1;
        } else {
            // fs::copy carries the permission bits over
            fs::copy(entry.path(), &target).map_err(|e| {
                RocketyError::io(
                    format!("copying {} to {}", entry.path().display(), target.display()),
                    e,
                )
            })?;
            files += 1;
        }
    }

    debug!("Copied {} files from {} to {}", files, src.display(), dst.display());
    Ok(files)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> RocketyResult<()> {
    let link = fs::read_link(src)
        .map_err(|e| RocketyError::io(format!("reading link {}", src.display()), e))?;
    std::os::unix::fs::symlink(&link, dst)
        .map_err(|e| RocketyError::io(format!("creating link {}", dst.display()), e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> RocketyResult<()> {
    fs::copy(src, dst)
        .map(|_| ())
        .map_err(|e| RocketyError::io(format!("copying {}", src.display()), e))
}

/// Move a directory tree, falling back to copy + delete across filesystems
pub fn move_tree(src: &Path, dst: &Path) -> RocketyResult<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(
                "rename {} -> {} failed ({}), copying instead",
                src.display(),
                dst.display(),
                e
            );
            copy_tree(src, dst)?;
            fs::remove_dir_all(src)
                .map_err(|e| RocketyError::io(format!("removing {}", src.display()), e))
        }
    }
}
