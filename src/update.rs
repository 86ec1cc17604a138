//! Check whether a newer rockety has been tagged

use crate::config::UpdateConfig;
use crate::error::{RocketyError, RocketyResult};
use crate::github::GithubClient;
use semver::Version;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct TagName {
    name: String,
}

/// Newest tagged version of the CLI, if the tag listing has a parseable one
pub fn latest_version(
    client: &GithubClient,
    settings: &UpdateConfig,
) -> RocketyResult<Option<Version>> {
    let tags: Vec<TagName> = client.list_tags(&settings.owner, &settings.repo)?;
    Ok(tags.first().and_then(|tag| parse_tag(&tag.name)))
}

/// Fail with `Outdated` when the newest tag is strictly newer than `current`
pub fn check(client: &GithubClient, settings: &UpdateConfig, current: &str) -> RocketyResult<()> {
    let current_version = Version::parse(current)
        .map_err(|e| RocketyError::Internal(format!("invalid package version {}: {}", current, e)))?;

    match latest_version(client, settings)? {
        Some(latest) if latest > current_version => Err(RocketyError::Outdated {
            current: current.to_string(),
            latest: format!("v{}", latest),
        }),
        Some(latest) => {
            debug!("rockety {} is up to date (latest {})", current, latest);
            Ok(())
        }
        None => {
            debug!("No parseable version tag found, skipping update check");
            Ok(())
        }
    }
}

fn parse_tag(name: &str) -> Option<Version> {
    Version::parse(name.trim_start_matches('v')).ok()
}
