//! Client configuration file.
//!
//! Stored as TOML in the platform configuration folder:
//! - macOS: ~/Library/Application Support/org.roster-ingest.roster/
//! - Windows: %APPDATA%/roster-ingest/roster/config/
//! - Linux: ~/.config/roster/
//!
//! ```toml
//! base_url = "http://localhost:8010/api"
//! timeout_secs = 60
//!
//! [session]
//! username = "coordinator"
//! role = "college"
//! college = "gpj"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use roster_gateway::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, GatewayConfig};
use roster_model::SessionContext;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "roster-ingest";
const APP_NAME: &str = "roster";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub session: SessionContext,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session: SessionContext::default(),
        }
    }
}

impl ClientConfig {
    /// Replace the base URL when one was given on the command line or in
    /// `ROSTER_API_URL`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url.map(str::trim).filter(|url| !url.is_empty()) {
            self.base_url = url.to_string();
        }
        self
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Default location of the configuration file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load the configuration from `path`.
///
/// Returns defaults if the file doesn't exist, cannot be read, or cannot be
/// parsed.
pub fn load_config(path: &Path) -> ClientConfig {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse configuration, using defaults");
                ClientConfig::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no configuration file, using defaults");
            ClientConfig::default()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read configuration, using defaults");
            ClientConfig::default()
        }
    }
}

/// Save the configuration, creating the parent directory if needed.
pub fn save_config(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("serialize configuration")?;
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "saved configuration");
    Ok(())
}
