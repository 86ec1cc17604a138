//! Configuration schema for Rockety
//!
//! Configuration is stored at `~/.config/rockety/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Template repository and download settings
    pub template: TemplateConfig,

    /// Release cache settings
    pub cache: CacheConfig,

    /// Dependency installation settings
    pub install: InstallConfig,

    /// Project creation behaviour
    pub create: CreateConfig,

    /// Self version check settings
    pub update: UpdateConfig,

    /// Task runner proxy settings
    pub proxy: ProxyConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Template repository settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// GitHub owner of the template repository
    pub owner: String,

    /// Template repository name
    pub repo: String,

    /// Branch fetched by `create --dev`
    pub dev_branch: String,

    /// GitHub API base URL
    pub api_base: String,

    /// GitHub web base URL (branch archives)
    pub web_base: String,

    /// Client identifier sent with every request
    pub user_agent: String,

    /// Request timeout in seconds (0 = no timeout)
    pub timeout_secs: u64,

    /// Template-only paths removed from a new project
    pub cleanup: Vec<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            owner: "ivandokov".to_string(),
            repo: "rockety".to_string(),
            dev_branch: "master".to_string(),
            api_base: "https://api.github.com".to_string(),
            web_base: "https://github.com".to_string(),
            user_agent: "Rockety-cli".to_string(),
            timeout_secs: 300,
            cleanup: vec![
                "LICENSE".to_string(),
                "README.md".to_string(),
                "CHANGELOG.md".to_string(),
                "public/.gitignore".to_string(),
                ".travis.yml".to_string(),
                ".github".to_string(),
            ],
        }
    }
}

/// Release cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Reuse previously extracted releases (default: true)
    pub enabled: bool,

    /// Cache root (default: ~/.rockety)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: None,
        }
    }
}

/// Dependency installation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Preferred package manager, used when its version probe succeeds
    pub alternate: String,

    /// Package manager used when the alternate is unavailable
    pub fallback: String,

    /// Arguments passed to the primary package manager
    pub args: Vec<String>,

    /// Second, independent package manager
    pub secondary: String,

    /// Manifest whose presence enables the secondary install
    pub secondary_manifest: String,

    /// Arguments passed to the secondary package manager
    pub secondary_args: Vec<String>,

    /// Kill an install job after N seconds (0 = disabled)
    pub timeout_secs: u64,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            alternate: "yarn".to_string(),
            fallback: "npm".to_string(),
            args: vec![
                "install".to_string(),
                "--loglevel".to_string(),
                "error".to_string(),
            ],
            secondary: "bower".to_string(),
            secondary_manifest: "bower.json".to_string(),
            secondary_args: vec!["install".to_string()],
            timeout_secs: 0,
        }
    }
}

/// What to do when the destination directory already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnExisting {
    /// Ask before replacing (declined in non-interactive sessions)
    #[default]
    Prompt,
    /// Refuse to continue
    Fail,
    /// Replace without asking
    Overwrite,
}

/// Project creation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateConfig {
    /// Behaviour when the destination directory exists
    pub on_existing: OnExisting,
}

/// Self version check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Check for a newer rockety before creating a project
    pub check: bool,

    /// GitHub owner of the CLI repository
    pub owner: String,

    /// CLI repository name
    pub repo: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            check: true,
            owner: "ivandokov".to_string(),
            repo: "rockety-cli".to_string(),
        }
    }
}

/// Task runner proxy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Task runner executable
    pub runner: String,

    /// Files that mark a Rockety project directory
    pub markers: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            runner: "gulp".to_string(),
            markers: vec!["gulpfile.js".to_string(), "rockety.yml".to_string()],
        }
    }
}
