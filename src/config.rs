use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Site-wide settings. Loaded from a JSON file and then overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// `http(s)://` URL or local directory holding the site.
    pub site_root: String,
    /// Directory under the site root with the JSON resources.
    pub data_dir: String,
    /// Resource name of the semester index.
    pub index_name: String,
    /// Document title shown in the page header.
    pub title: String,
    /// Stylesheet href relative to the site root.
    pub stylesheet: Option<String>,
    #[serde(with = "humantime_serde")]
    pub fetch_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_root: ".".to_string(),
            data_dir: "data".to_string(),
            index_name: "semesters-index".to_string(),
            title: "Seminar".to_string(),
            stylesheet: Some("style.css".to_string()),
            fetch_timeout: None,
            user_agent: format!("seminar-site/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// `<config dir>/seminar-site/config.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("seminar-site").join("config.json"))
}

impl SiteConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
    }

    /// Explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading default config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
