//! Release resolution
//!
//! Development mode never talks to the network: the branch archive URL is
//! fixed by convention. Tagged mode takes the first (newest) entry of the
//! repository's tag listing.

use super::{Release, ReleaseOrigin};
use crate::config::TemplateConfig;
use crate::error::{RocketyError, RocketyResult};
use crate::github::{GithubClient, Tag};
use tracing::{debug, info};

/// Prefix reserved for development identifiers
pub const DEV_PREFIX: &str = "~dev-";

/// GitHub abbreviates the commit in zipball directory names to this length
const SHORT_SHA_LEN: usize = 7;

/// Resolve the release to scaffold from
pub fn resolve(
    client: &GithubClient,
    template: &TemplateConfig,
    development: bool,
) -> RocketyResult<Release> {
    if development {
        let release = development_release(template);
        debug!("Development mode, using {}", release.archive_url);
        return Ok(release);
    }

    let tags: Vec<Tag> = client.list_tags(&template.owner, &template.repo)?;
    let latest = tags
        .first()
        .ok_or_else(|| RocketyError::NoReleases(format!("{}/{}", template.owner, template.repo)))?;

    let release = release_from_tag(template, latest)?;
    info!("Latest release is {}", release.identifier);
    Ok(release)
}

/// The fixed release for the development branch
pub fn development_release(template: &TemplateConfig) -> Release {
    // GitHub flattens slashes in branch names when naming archive roots
    let branch = template.dev_branch.replace('/', "-");
    let root = format!("{}-{}", template.repo, branch);

    Release {
        identifier: format!("{}{}", DEV_PREFIX, branch),
        archive_url: format!(
            "{}/{}/{}/archive/{}.zip",
            template.web_base.trim_end_matches('/'),
            template.owner,
            template.repo,
            template.dev_branch
        ),
        origin: ReleaseOrigin::Development,
        root_prefix: root.clone(),
        expected_root: root,
    }
}

/// Build a tagged release from a tag listing entry
pub fn release_from_tag(template: &TemplateConfig, tag: &Tag) -> RocketyResult<Release> {
    if !is_safe_identifier(&tag.name) {
        return Err(RocketyError::InvalidRelease(tag.name.clone()));
    }

    let prefix = format!("{}-{}-", template.owner, template.repo);
    let short_sha: String = tag.commit.sha.chars().take(SHORT_SHA_LEN).collect();

    Ok(Release {
        identifier: tag.name.clone(),
        archive_url: tag.zipball_url.clone(),
        origin: ReleaseOrigin::Tagged,
        expected_root: format!("{}{}", prefix, short_sha),
        root_prefix: prefix,
    })
}

/// A tag is usable as a cache directory name and outside the development namespace
fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with('.')
        && !name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '~' | ':' | '\0') || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const TAGS: &str = r#"[
        {"name":"v2.1.0","zipball_url":"https://api.github.com/repos/ivandokov/rockety/zipball/v2.1.0","commit":{"sha":"abcdef1234567890"}},
        {"name":"v2.0.0","zipball_url":"https://api.github.com/repos/ivandokov/rockety/zipball/v2.0.0","commit":{"sha":"1111111111111111"}}
    ]"#;

    fn template_for(url: String) -> TemplateConfig {
        TemplateConfig {
            api_base: url,
            timeout_secs: 10,
            ..TemplateConfig::default()
        }
    }

    fn tag(name: &str) -> Tag {
        Tag {
            name: name.to_string(),
            zipball_url: "https://example.com/z.zip".to_string(),
            commit: crate::github::TagCommit {
                sha: "0123456789abcdef".to_string(),
            },
        }
    }

    #[test]
    fn resolve_takes_newest_tag() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/repos/ivandokov/rockety/tags")
            .with_status(200)
            .with_body(TAGS)
            .expect(1)
            .create();

        let template = template_for(server.url());
        let release = resolve(&GithubClient::new(&template), &template, false).unwrap();

        mock.assert();
        assert_eq!(release.identifier, "v2.1.0");
        assert_eq!(
            release.archive_url,
            "https://api.github.com/repos/ivandokov/rockety/zipball/v2.1.0"
        );
        assert_eq!(release.origin, ReleaseOrigin::Tagged);
        assert_eq!(release.expected_root, "ivandokov-rockety-abcdef1");
        assert_eq!(release.root_prefix, "ivandokov-rockety-");
    }

    #[test]
    fn development_mode_issues_no_request() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create();

        let template = template_for(server.url());
        let client = GithubClient::new(&template);
        let first = resolve(&client, &template, true).unwrap();
        let second = resolve(&client, &template, true).unwrap();

        mock.assert();
        assert_eq!(first, second);
        assert_eq!(first.identifier, "~dev-master");
        assert_eq!(
            first.archive_url,
            "https://github.com/ivandokov/rockety/archive/master.zip"
        );
        assert_eq!(first.expected_root, "rockety-master");
        assert_eq!(first.origin, ReleaseOrigin::Development);
        assert!(!first.is_cacheable());
    }

    #[test]
    fn development_and_tagged_identifiers_are_disjoint() {
        let template = TemplateConfig::default();
        let dev = development_release(&template);

        // A tag literally named after the dev branch stays distinct
        let tagged = release_from_tag(&template, &tag("master")).unwrap();
        assert_ne!(dev.identifier, tagged.identifier);

        // And no tag can claim the development namespace
        assert!(release_from_tag(&template, &tag(&dev.identifier)).is_err());
    }

    #[test]
    fn empty_tag_listing_fails() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/repos/ivandokov/rockety/tags")
            .with_status(200)
            .with_body("[]")
            .create();

        let template = template_for(server.url());
        let err = resolve(&GithubClient::new(&template), &template, false).unwrap_err();
        assert!(matches!(err, RocketyError::NoReleases(_)));
    }

    #[test]
    fn remote_failure_carries_status() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/repos/ivandokov/rockety/tags")
            .with_status(404)
            .with_body(r#"{"message":"Not Found"}"#)
            .create();

        let template = template_for(server.url());
        let err = resolve(&GithubClient::new(&template), &template, false).unwrap_err();
        assert_eq!(err.to_string(), "404 cannot connect to GitHub: Not Found");
    }

    #[test]
    fn unsafe_tag_names_rejected() {
        let template = TemplateConfig::default();
        for name in ["", "..", "release/1.0", "a\\b", ".hidden"] {
            assert!(
                matches!(
                    release_from_tag(&template, &tag(name)),
                    Err(RocketyError::InvalidRelease(_))
                ),
                "{:?} should be rejected",
                name
            );
        }
        assert!(release_from_tag(&template, &tag("v1.0.0-beta.1")).is_ok());
    }

    #[test]
    fn development_branch_with_slash() {
        let template = TemplateConfig {
            dev_branch: "feature/grid".to_string(),
            ..TemplateConfig::default()
        };
        let release = development_release(&template);
        assert_eq!(release.identifier, "~dev-feature-grid");
        assert_eq!(release.expected_root, "rockety-feature-grid");
        assert!(release.archive_url.ends_with("/archive/feature/grid.zip"));
        assert_eq!(release.to_string(), "feature-grid (development)");
    }
}
