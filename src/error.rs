//! Error types for Rockety
//!
//! All modules use `RocketyResult<T>` as their return type. Dependency
//! install failures are not errors; they are reported through
//! `project::install::InstallReport` as warnings.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Rockety operations
pub type RocketyResult<T> = Result<T, RocketyError>;

/// All errors that can occur in Rockety
#[derive(Error, Debug)]
pub enum RocketyError {
    // Request validation errors
    #[error("{0}")]
    Validation(String),

    // Remote errors
    #[error("Cannot reach {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("{status} cannot connect to GitHub: {message}")]
    Remote { status: u16, message: String },

    #[error("No releases published for {0}")]
    NoReleases(String),

    #[error("Release tag {0:?} cannot be used as a cache directory name")]
    InvalidRelease(String),

    #[error("You are using version {current} of rockety and the latest is {latest}")]
    Outdated { current: String, latest: String },

    // Archive errors
    #[error("Download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Cannot extract {archive}: {reason}")]
    Extraction { archive: String, reason: String },

    // Proxy errors
    #[error("You are not in Rockety project directory! ({})", .0.display())]
    NotAProject(PathBuf),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl RocketyError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an extraction error
    pub fn extraction(archive: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was raised before anything touched disk or network
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Outdated { .. } => {
                Some("Upgrade rockety (cargo install rockety) or pass --noupdate")
            }
            Self::Remote { status: 403, .. } => {
                Some("GitHub rate limit reached, wait a few minutes and retry")
            }
            Self::Remote { .. } => Some("Check template.api_base in the rockety config and retry"),
            Self::Network { .. } => Some("Check your internet connection and retry"),
            Self::NotAProject(_) => {
                Some("Run this from a directory containing gulpfile.js and rockety.yml")
            }
            Self::Extraction { .. } => {
                Some("Remove the cached release with: rockety cache clear")
            }
            _ => None,
        }
    }
}
