//! Configuration for the `dora` client.
//!
//! Settings are read from `dora.toml` and then overridden by the
//! environment and the command line, in that order.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000/api/"
//! timeout_secs = 30
//!
//! [releases]
//! page_size = 10
//!
//! [dashboard]
//! default_range_days = 30
//! chart_range = "90d"
//!
//! [session]
//! file = "/home/me/.config/dora/session.json"
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/dora"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::normalize_base_url;
use crate::metrics::TimeRange;
use crate::releases::PAGE_SIZES;
use crate::session::SessionStore;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/";
pub const CONFIG_FILE_NAME: &str = "dora.toml";

/// `[api]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[releases]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasesSection {
    /// Rows per page, one of 10, 20, 30, 40, 50
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    10
}

impl Default for ReleasesSection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// `[dashboard]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSection {
    /// Days covered by the metric cards, ending today
    #[serde(default = "default_range_days")]
    pub default_range_days: u32,
    /// Initial chart range: 7d, 30d or 90d
    #[serde(default = "default_chart_range")]
    pub chart_range: String,
}

fn default_range_days() -> u32 {
    30
}

fn default_chart_range() -> String {
    "90d".to_string()
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            default_range_days: default_range_days(),
            chart_range: default_chart_range(),
        }
    }
}

/// `[session]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for a daily rolling log file. Unset means stderr only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

/// Contents of `dora.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoraToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub releases: ReleasesSection,
    #[serde(default)]
    pub dashboard: DashboardSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl DoraToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse dora.toml")
    }

    /// Load `path`, or the defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize dora.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Err(e) = normalize_base_url(&self.api.base_url) {
            warnings.push(format!("Invalid api.base_url: {}", e));
        }

        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs is 0; every request would time out".to_string());
        }

        if !PAGE_SIZES.contains(&self.releases.page_size) {
            warnings.push(format!(
                "Unsupported releases.page_size {}: should be one of 10, 20, 30, 40, 50",
                self.releases.page_size
            ));
        }

        if self.dashboard.chart_range.parse::<TimeRange>().is_err() {
            warnings.push(format!(
                "Invalid dashboard.chart_range '{}': should be 7d, 30d or 90d",
                self.dashboard.chart_range
            ));
        }

        warnings
    }
}

/// `<config_dir>/dora/dora.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dora").join(CONFIG_FILE_NAME))
}

/// Values that beat the file: the CLI flag, or its environment variable.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub verbose: bool,
    pub yes: bool,
}

/// Effective configuration after layering file, environment and CLI.
#[derive(Debug, Clone)]
pub struct DoraConfig {
    /// Where `dora.toml` was (or would be) read from
    pub config_path: PathBuf,
    pub toml: DoraToml,
    pub api_url: String,
    pub session_file: PathBuf,
    pub verbose: bool,
    pub yes: bool,
}

impl DoraConfig {
    pub fn resolve(mut overrides: Overrides) -> Result<Self> {
        let config_path = match overrides.config_path.take() {
            Some(path) => path,
            None => default_config_path()
                .context("Could not determine a config directory; pass --config")?,
        };
        let toml = DoraToml::load_or_default(&config_path)?;
        Self::from_parts(config_path, toml, overrides)
    }

    /// Layer `overrides` over an already loaded file.
    pub fn from_parts(config_path: PathBuf, toml: DoraToml, overrides: Overrides) -> Result<Self> {
        let api_url = overrides
            .api_url
            .unwrap_or_else(|| toml.api.base_url.clone());

        let session_file = match overrides.session_file.or_else(|| toml.session.file.clone()) {
            Some(path) => path,
            None => SessionStore::default_path()
                .context("Could not determine a session file location; pass --session-file")?,
        };

        Ok(Self {
            config_path,
            toml,
            api_url,
            session_file,
            verbose: overrides.verbose,
            yes: overrides.yes,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.api.timeout_secs)
    }

    /// The configured page size, or the default when it is unsupported.
    pub fn page_size(&self) -> usize {
        if PAGE_SIZES.contains(&self.toml.releases.page_size) {
            self.toml.releases.page_size
        } else {
            default_page_size()
        }
    }

    pub fn chart_range(&self) -> TimeRange {
        self.toml.dashboard.chart_range.parse().unwrap_or_default()
    }

    pub fn dashboard_days(&self) -> i64 {
        i64::from(self.toml.dashboard.default_range_days)
    }

    pub fn log_level(&self) -> &str {
        &self.toml.logging.level
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.toml.logging.dir.as_deref()
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(&self.session_file)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.toml.validate();
        if self.api_url != self.toml.api.base_url
            && let Err(e) = normalize_base_url(&self.api_url)
        {
            warnings.push(format!("Invalid API URL override: {}", e));
        }
        warnings
    }
}
