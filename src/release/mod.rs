//! Template releases: resolution, caching and download
//!
//! A [`Release`] is an immutable snapshot of the template, either a tagged
//! version or the head of the development branch.
//!
//! # Identifiers
//!
//! | Origin      | Identifier        | Cached |
//! |-------------|-------------------|--------|
//! | Tagged      | tag name (`v2.1.0`) | yes  |
//! | Development | `~dev-<branch>`   | never  |
//!
//! `~` cannot appear in a git ref name, so the two namespaces never collide
//! inside the cache root.

pub mod cache;
pub mod fetch;
pub mod resolve;

pub use cache::{CacheEntry, ReleaseCache};
pub use fetch::{extract_zip, fetch, locate_root};
pub use resolve::{development_release, release_from_tag, resolve, DEV_PREFIX};

use std::fmt;

/// Where a release came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOrigin {
    /// Latest entry of the tag listing
    Tagged,
    /// Head of the development branch
    Development,
}

/// A resolved template release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Filesystem-safe identifier, also the cache directory name
    pub identifier: String,
    /// Zip archive URL
    pub archive_url: String,
    pub origin: ReleaseOrigin,
    /// Every top-level directory name produced by the archive starts with this
    pub root_prefix: String,
    /// Predicted name of the archive's top-level directory
    pub expected_root: String,
}

impl Release {
    /// Development snapshots move on, so they are never cached
    pub fn is_cacheable(&self) -> bool {
        self.origin == ReleaseOrigin::Tagged
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            ReleaseOrigin::Tagged => write!(f, "{}", self.identifier),
            ReleaseOrigin::Development => write!(
                f,
                "{} (development)",
                self.identifier.trim_start_matches(DEV_PREFIX)
            ),
        }
    }
}
