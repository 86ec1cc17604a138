//! Persistent cache of extracted releases
//!
//! Layout: `<root>/<release identifier>/` holds the extracted template tree.
//! Entries are written once by renaming a fresh extraction into place and are
//! never modified afterwards. Hidden `.staging-*` directories under the root
//! are scratch space for downloads in progress and are not cache entries.

use crate::error::{RocketyError, RocketyResult};
use crate::paths::PathState;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

const STAGING_PREFIX: &str = ".staging-";

/// A previously extracted release
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub identifier: String,
    pub path: PathBuf,
    /// When the entry was stored, if the filesystem reports it
    pub stored_at: Option<DateTime<Utc>>,
}

/// Release cache rooted at a directory
#[derive(Debug, Clone)]
pub struct ReleaseCache {
    root: PathBuf,
}

impl ReleaseCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.rockety`
    pub fn default_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rockety")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the cache root if needed; an existing root is fine
    pub fn ensure_root(&self) -> RocketyResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            RocketyError::io(format!("creating cache directory {}", self.root.display()), e)
        })
    }

    pub fn entry_path(&self, identifier: &str) -> PathBuf {
        self.root.join(identifier)
    }

    /// Path of the cached extraction for `identifier`, if present
    pub fn lookup(&self, identifier: &str) -> RocketyResult<Option<PathBuf>> {
        let path = self.entry_path(identifier);
        match PathState::of(&path)? {
            PathState::Directory => {
                debug!("Cache hit for {} at {}", identifier, path.display());
                Ok(Some(path))
            }
            PathState::File => {
                debug!("Ignoring non-directory cache entry {}", path.display());
                Ok(None)
            }
            PathState::Absent => Ok(None),
        }
    }

    /// Move a fresh extraction into the cache under `identifier`.
    ///
    /// The extraction must live on the same filesystem as the root (see
    /// [`ReleaseCache::staging_dir`]) so the rename is atomic. If an entry
    /// appeared in the meantime it wins and the extraction is left for the
    /// caller's staging directory to discard. A regular file squatting on
    /// the entry path is a corrupt entry and is replaced.
    pub fn store(&self, identifier: &str, extracted: &Path) -> RocketyResult<PathBuf> {
        let target = self.entry_path(identifier);

        match PathState::of(&target)? {
            PathState::Directory => {
                debug!("{} already cached, keeping existing entry", identifier);
                return Ok(target);
            }
            PathState::File => {
                warn!("Replacing corrupt cache entry {}", target.display());
                fs::remove_file(&target).map_err(|e| {
                    RocketyError::io(format!("removing corrupt entry {}", target.display()), e)
                })?;
            }
            PathState::Absent => {}
        }

        fs::rename(extracted, &target).map_err(|e| {
            RocketyError::io(
                format!(
                    "moving {} into cache at {}",
                    extracted.display(),
                    target.display()
                ),
                e,
            )
        })?;

        info!("Cached release {} at {}", identifier, target.display());
        Ok(target)
    }

    /// Temporary directory inside the root, removed when dropped
    pub fn staging_dir(&self) -> RocketyResult<TempDir> {
        self.ensure_root()?;
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.root)
            .map_err(|e| {
                RocketyError::io(
                    format!("creating staging directory in {}", self.root.display()),
                    e,
                )
            })
    }

    /// All cached releases, sorted by identifier
    pub fn entries(&self) -> RocketyResult<Vec<CacheEntry>> {
        if PathState::of(&self.root)? != PathState::Directory {
            return Ok(Vec::new());
        }

        let read_dir = fs::read_dir(&self.root).map_err(|e| {
            RocketyError::io(format!("reading cache directory {}", self.root.display()), e)
        })?;

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| {
                RocketyError::io(format!("reading cache directory {}", self.root.display()), e)
            })?;
            let name = item.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let metadata = match item.metadata() {
                Ok(m) if m.is_dir() => m,
                _ => continue,
            };

            entries.push(CacheEntry {
                identifier: name,
                path: item.path(),
                stored_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        entries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(entries)
    }

    /// Remove a single entry, returning whether it existed
    pub fn remove(&self, identifier: &str) -> RocketyResult<bool> {
        let path = self.entry_path(identifier);
        if PathState::of(&path)? != PathState::Directory {
            return Ok(false);
        }

        fs::remove_dir_all(&path)
            .map_err(|e| RocketyError::io(format!("removing {}", path.display()), e))?;
        info!("Removed cached release {}", identifier);
        Ok(true)
    }

    /// Remove every entry and leftover staging directory
    pub fn clear(&self) -> RocketyResult<usize> {
        let mut removed = 0;
        for entry in self.entries()? {
            if self.remove(&entry.identifier)? {
                removed += 1;
            }
        }

        if let Ok(read_dir) = fs::read_dir(&self.root) {
            for item in read_dir.flatten() {
                if !item.file_name().to_string_lossy().starts_with(STAGING_PREFIX) {
                    continue;
                }
                let path = item.path();
                debug!("Removing stale staging directory {}", path.display());
                let result = match item.file_type() {
                    Ok(kind) if kind.is_dir() => fs::remove_dir_all(&path),
                    _ => fs::remove_file(&path),
                };
                if let Err(e) = result {
                    warn!("Could not remove {}: {}", path.display(), e);
                }
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted_tree(parent: &Path, name: &str) -> PathBuf {
        let dir = parent.join(name);
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::write(dir.join("package.json"), "{}").unwrap();
        dir
    }

    #[test]
    fn ensure_root_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let cache = ReleaseCache::new(temp.path().join(".rockety"));
        cache.ensure_root().unwrap();
        cache.ensure_root().unwrap();
        assert!(cache.root().is_dir());
    }

    #[test]
    fn lookup_miss_then_hit_after_store() {
        let temp = TempDir::new().unwrap();
        let cache = ReleaseCache::new(temp.path().join(".rockety"));
        assert!(cache.lookup("v2.1.0").unwrap().is_none());

        let staging = cache.staging_dir().unwrap();
        let extracted = extracted_tree(staging.path(), "ivandokov-rockety-abcdef1");

        let stored = cache.store("v2.1.0", &extracted).unwrap();
        assert_eq!(stored, cache.entry_path("v2.1.0"));
        assert!(!extracted.exists(), "store renames, not copies");

        // Repeated lookups keep returning the same entry
        assert_eq!(cache.lookup("v2.1.0").unwrap(), Some(stored.clone()));
        assert_eq!(cache.lookup("v2.1.0").unwrap(), Some(stored.clone()));
        assert!(stored.join("package.json").exists());
    }

    #[test]
    fn store_keeps_existing_entry() {
        let temp = TempDir::new().unwrap();
        let cache = ReleaseCache::new(temp.path().join(".rockety"));
        let staging = cache.staging_dir().unwrap();

        let first = extracted_tree(staging.path(), "first");
        cache.store("v1.0.0", &first).unwrap();

        let second = extracted_tree(staging.path(), "second");
        fs::write(second.join("marker"), "new").unwrap();
        let stored = cache.store("v1.0.0", &second).unwrap();

        assert!(!stored.join("marker").exists());
    }

    #[test]
    fn entries_skip_staging_and_files() {
        let temp = TempDir::new().unwrap();
        let cache = ReleaseCache::new(temp.path().join(".rockety"));
        let staging = cache.staging_dir().unwrap();

        let a = extracted_tree(staging.path(), "a");
        let b = extracted_tree(staging.path(), "b");
        cache.store("v2.0.0", &b).unwrap();
        cache.store("v1.0.0", &a).unwrap();
        fs::write(cache.root().join("notes.txt"), "x").unwrap();

        let ids: Vec<_> = cache
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| e.identifier)
            .collect();
        assert_eq!(ids, vec!["v1.0.0", "v2.0.0"]);
    }

    #[test]
    fn entries_of_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let cache = ReleaseCache::new(temp.path().join("nope"));
        assert!(cache.entries().unwrap().is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let temp = TempDir::new().unwrap();
        let cache = ReleaseCache::new(temp.path().join(".rockety"));
        let staging = cache.staging_dir().unwrap();
        let extracted = extracted_tree(staging.path(), "tree");
        cache.store("v1.0.0", &extracted).unwrap();

        assert_eq!(cache.clear().unwrap(), 1);
        assert!(cache.lookup("v1.0.0").unwrap().is_none());
        assert!(!cache.remove("v1.0.0").unwrap());
    }

    #[test]
    fn store_replaces_file_at_entry_path() {
        let temp = TempDir::new().unwrap();
        let cache = ReleaseCache::new(temp.path().join(".rockety"));
        let staging = cache.staging_dir().unwrap();
        fs::write(cache.entry_path("v1.0.0"), "truncated").unwrap();
        assert!(cache.lookup("v1.0.0").unwrap().is_none());

        let extracted = extracted_tree(staging.path(), "tree");
        let stored = cache.store("v1.0.0", &extracted).unwrap();

        assert!(stored.join("package.json").is_file());
        assert_eq!(cache.lookup("v1.0.0").unwrap(), Some(stored));
    }

    #[test]
    fn clear_removes_stale_staging_leftovers() {
        let temp = TempDir::new().unwrap();
        let cache = ReleaseCache::new(temp.path().join(".rockety"));
        cache.ensure_root().unwrap();
        let stale_dir = cache.root().join(".staging-abc123");
        fs::create_dir_all(stale_dir.join("rockety-master")).unwrap();
        let stale_file = cache.root().join(".staging-file");
        fs::write(&stale_file, "partial").unwrap();

        assert_eq!(cache.clear().unwrap(), 0);
        assert!(!stale_dir.exists());
        assert!(!stale_file.exists());
    }
}
