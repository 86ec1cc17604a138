//! Blocking HTTP client for the GitHub API and archive downloads
//!
//! Every request carries the configured client identifier; GitHub throttles
//! anonymous requests without a `User-Agent` much harder.

use crate::config::TemplateConfig;
use crate::error::{RocketyError, RocketyResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::{Read, Write};
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Progress callback: (bytes downloaded, total bytes if known)
pub type Progress<'a> = &'a dyn Fn(u64, Option<u64>);

/// Tag entry of `GET /repos/{owner}/{repo}/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
    pub zipball_url: String,
    pub commit: TagCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagCommit {
    pub sha: String,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

/// GitHub client bound to one API base and client identifier
#[derive(Clone)]
pub struct GithubClient {
    agent: Agent,
    api_base: String,
    user_agent: String,
}

impl GithubClient {
    /// Build a client from the template settings
    pub fn new(template: &TemplateConfig) -> Self {
        let timeout =
            (template.timeout_secs > 0).then(|| Duration::from_secs(template.timeout_secs));
        let agent: Agent = Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_base: template.api_base.trim_end_matches('/').to_string(),
            user_agent: template.user_agent.clone(),
        }
    }

    /// List tags of a repository, newest first
    pub fn list_tags<T: DeserializeOwned>(
        &self,
        owner: &str,
        repo: &str,
    ) -> RocketyResult<Vec<T>> {
        let url = format!("{}/repos/{}/{}/tags", self.api_base, owner, repo);
        self.get_json(&url)
    }

    /// GET a JSON document, mapping non-success statuses and unreadable
    /// documents to `Remote`
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> RocketyResult<T> {
        debug!("GET {}", url);

        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "application/vnd.github+json")
            .call()
            .map_err(|e| RocketyError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RocketyError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(RocketyError::Remote {
                status: status.as_u16(),
                message: remote_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| RocketyError::Remote {
            status: status.as_u16(),
            message: format!("unexpected response from {}: {}", url, e),
        })
    }

    /// Stream a URL into `dest`, returning the number of bytes written
    pub fn download(
        &self,
        url: &str,
        dest: &mut impl Write,
        progress: Option<Progress<'_>>,
    ) -> RocketyResult<u64> {
        debug!("Downloading {}", url);

        let download_error = |reason: String| RocketyError::Download {
            url: url.to_string(),
            reason,
        };

        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(format!("server responded {}", status)));
        }

        let total = response.body().content_length();
        let mut reader = response.body_mut().as_reader();
        let mut buffer = [0; 8192];
        let mut downloaded: u64 = 0;

        loop {
            let read = reader
                .read(&mut buffer)
                .map_err(|e| download_error(format!("stream interrupted: {}", e)))?;
            if read == 0 {
                break;
            }

            dest.write_all(&buffer[..read])
                .map_err(|e| download_error(format!("writing archive: {}", e)))?;
            downloaded += read as u64;

            if let Some(callback) = progress {
                callback(downloaded, total);
            }
        }

        if let Some(expected) = total {
            if downloaded != expected {
                return Err(download_error(format!(
                    "expected {} bytes, received {}",
                    expected, downloaded
                )));
            }
        }

        dest.flush()
            .map_err(|e| download_error(format!("writing archive: {}", e)))?;

        debug!("Downloaded {} bytes", downloaded);
        Ok(downloaded)
    }
}

/// Extract GitHub's `message` field, falling back to the raw body
fn remote_message(body: &str) -> String {
    serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
