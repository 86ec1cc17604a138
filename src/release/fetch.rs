//! Archive download and extraction
//!
//! The archive is streamed into a named temporary file that is deleted when
//! it goes out of scope, whatever the outcome. Extraction happens inside a
//! caller-owned staging directory; the single top-level directory of the
//! archive is then located by the naming convention declared on the
//! [`Release`].

use super::Release;
use crate::error::{RocketyError, RocketyResult};
use crate::github::{GithubClient, Progress};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Download `release` and extract it into `staging`.
///
/// Returns the path of the extracted top-level directory.
pub fn fetch(
    client: &GithubClient,
    release: &Release,
    staging: &Path,
    progress: Option<Progress<'_>>,
) -> RocketyResult<PathBuf> {
    let mut archive = tempfile::Builder::new()
        .prefix("rockety-")
        .suffix(".zip")
        .tempfile()
        .map_err(|e| RocketyError::io("creating temporary archive file", e))?;

    client.download(&release.archive_url, archive.as_file_mut(), progress)?;

    extract_zip(archive.path(), staging)?;
    // `archive` is removed here on every path out of this function
    locate_root(staging, release)
}

/// Extract a zip archive into `dest`, keeping unix file modes.
///
/// Entries whose path would escape `dest` are skipped.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> RocketyResult<()> {
    let archive_name = archive_path.display().to_string();
    let file = fs::File::open(archive_path)
        .map_err(|e| RocketyError::io(format!("opening archive {}", archive_name), e))?;

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| RocketyError::extraction(&archive_name, e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| RocketyError::extraction(&archive_name, e.to_string()))?;

        let outpath = match entry.enclosed_name() {
            Some(path) => dest.join(path),
            None => {
                warn!("Skipping unsafe archive entry {:?}", entry.name());
                continue;
            }
        };

        #[cfg(unix)]
        if entry.is_symlink() {
            let mut target = String::new();
            io::Read::read_to_string(&mut entry, &mut target).map_err(|e| {
                RocketyError::extraction(&archive_name, format!("{}: {}", entry.name(), e))
            })?;
            extract_symlink(dest, &outpath, Path::new(&target))?;
            continue;
        }

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| RocketyError::io(format!("creating {}", outpath.display()), e))?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| RocketyError::io(format!("creating {}", parent.display()), e))?;
            }

            let mut outfile = fs::File::create(&outpath)
                .map_err(|e| RocketyError::io(format!("creating {}", outpath.display()), e))?;
            io::copy(&mut entry, &mut outfile).map_err(|e| {
                RocketyError::extraction(&archive_name, format!("{}: {}", entry.name(), e))
            })?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                let perms = fs::Permissions::from_mode(mode & 0o7777);
                fs::set_permissions(&outpath, perms).map_err(|e| {
                    RocketyError::io(format!("setting permissions on {}", outpath.display()), e)
                })?;
            }
        }
    }

    debug!("Extracted {} entries into {}", archive.len(), dest.display());
    Ok(())
}

/// Recreate a symlink entry, skipping links that point outside `dest`
#[cfg(unix)]
fn extract_symlink(dest: &Path, link: &Path, target: &Path) -> RocketyResult<()> {
    if !link_stays_inside(dest, link, target) {
        warn!(
            "Skipping archive link {} pointing outside the archive: {}",
            link.display(),
            target.display()
        );
        return Ok(());
    }

    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| RocketyError::io(format!("creating {}", parent.display()), e))?;
    }
    std::os::unix::fs::symlink(target, link)
        .map_err(|e| RocketyError::io(format!("creating link {}", link.display()), e))
}

/// Whether `target`, relative to the directory of `link`, resolves inside `dest`.
///
/// Purely lexical: links already extracted are all kept inside `dest`.
#[cfg(unix)]
fn link_stays_inside(dest: &Path, link: &Path, target: &Path) -> bool {
    use std::path::Component;

    let Ok(relative) = link.strip_prefix(dest) else {
        return false;
    };
    let mut depth = relative.components().count().saturating_sub(1);

    for component in target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(up) => depth = up,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Find the single top-level directory of an extracted release.
///
/// Exactly one directory in `dir` may start with `release.root_prefix`;
/// none or several is an extraction error.
pub fn locate_root(dir: &Path, release: &Release) -> RocketyResult<PathBuf> {
    let read_dir = fs::read_dir(dir)
        .map_err(|e| RocketyError::io(format!("reading {}", dir.display()), e))?;

    let mut matches = Vec::new();
    for item in read_dir {
        let item = item.map_err(|e| RocketyError::io(format!("reading {}", dir.display()), e))?;
        let is_dir = item.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let name = item.file_name().to_string_lossy().into_owned();
        if is_dir && name.starts_with(&release.root_prefix) {
            matches.push(name);
        }
    }
    matches.sort();

    match matches.as_slice() {
        [] => Err(RocketyError::extraction(
            &release.archive_url,
            format!("no top-level directory matching '{}*'", release.root_prefix),
        )),
        [name] => {
            if *name != release.expected_root {
                debug!(
                    "Archive root {} differs from predicted {}",
                    name, release.expected_root
                );
            }
            Ok(dir.join(name))
        }
        several => Err(RocketyError::extraction(
            &release.archive_url,
            format!("ambiguous top-level directories: {}", several.join(", ")),
        )),
    }
}
