//! Application configuration management.

use std::path::{Path, PathBuf};

use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::client::FallbackPolicy;
use crate::wizard::{Domain, Flow};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service locations
    #[serde(default)]
    pub server: ServerConfig,

    /// Recommendation behaviour
    #[serde(default)]
    pub recommendations: RecommendationsConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Recommendation service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Unified service URL (e.g., "http://localhost:8000")
    #[serde(default = "default_url")]
    pub url: String,

    /// Legacy TV service URL
    #[serde(default = "default_legacy_url")]
    pub legacy_url: String,
}

/// Recommendation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationsConfig {
    /// What to show when the service fails
    #[serde(default)]
    pub fallback: FallbackPolicy,

    /// Show the legacy TV tab
    #[serde(default)]
    pub legacy_tv: bool,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tab selected at startup
    #[serde(default)]
    pub default_domain: Domain,

    /// Show cover images (requires sixel/kitty support)
    #[serde(default = "default_true")]
    pub show_covers: bool,
}

fn default_url() -> String {
    String::from("http://localhost:8000")
}

fn default_legacy_url() -> String {
    String::from("http://localhost:5000")
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            legacy_url: default_legacy_url(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_domain: Domain::default(),
            show_covers: true,
        }
    }
}

impl Config {
    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;

        Ok(config_dir.join("recs-tui").join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;

        config.server.url = config.server.url.trim().to_string();
        config.server.legacy_url = config.server.legacy_url.trim().to_string();

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Check that both service URLs are usable.
    pub fn is_valid(&self) -> bool {
        is_http_url(&self.server.url)
            && (!self.recommendations.legacy_tv || is_http_url(&self.server.legacy_url))
    }

    /// Tabs shown in the tab bar, in order.
    pub fn enabled_flows(&self) -> Vec<Flow> {
        Flow::all()
            .iter()
            .copied()
            .filter(|f| *f != Flow::LegacyTv || self.recommendations.legacy_tv)
            .collect()
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
