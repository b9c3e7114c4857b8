//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.a11yhistory.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".a11yhistory.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote client settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Report rendering settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Report store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory with one directory per website.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Issue-list file name inside each snapshot.
    #[serde(default = "default_issues_file")]
    pub issues_file: String,

    /// Screenshot file name inside each snapshot.
    #[serde(default = "default_screenshot_file")]
    pub screenshot_file: String,

    /// URL prefix under which the screenshot server exposes the store.
    #[serde(default = "default_screenshot_base_url")]
    pub screenshot_base_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
            issues_file: default_issues_file(),
            screenshot_file: default_screenshot_file(),
            screenshot_base_url: default_screenshot_base_url(),
        }
    }
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("public/reports")
}

fn default_issues_file() -> String {
    crate::store::DEFAULT_ISSUES_FILE.to_string()
}

fn default_screenshot_file() -> String {
    crate::store::DEFAULT_SCREENSHOT_FILE.to_string()
}

fn default_screenshot_base_url() -> String {
    "/reports".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Remote client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Fetch timeout in seconds.
    #[serde(default = "default_client_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_client_timeout(),
        }
    }
}

fn default_client_timeout() -> u64 {
    30
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include code snippets in Markdown reports.
    #[serde(default = "default_true")]
    pub include_code: bool,

    /// Include remediation suggestions in Markdown reports.
    #[serde(default = "default_true")]
    pub include_suggestions: bool,

    /// Line color of the issues-over-time chart.
    #[serde(default = "default_line_color")]
    pub line_color: String,

    /// Curve tension of the issues-over-time chart.
    #[serde(default = "default_line_tension")]
    pub line_tension: f64,

    /// Slice colors of the distribution chart.
    #[serde(default = "crate::presentation::charts::default_palette")]
    pub palette: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_code: true,
            include_suggestions: true,
            line_color: default_line_color(),
            line_tension: default_line_tension(),
            palette: crate::presentation::charts::default_palette(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_line_color() -> String {
    "rgba(75,192,192,1)".to_string()
}

fn default_line_tension() -> f64 {
    0.4
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref reports_dir) = args.reports_dir {
            self.store.reports_dir = reports_dir.clone();
        }

        if let Some(ref bind) = args.bind {
            self.server.bind = bind.clone();
        }

        if let Some(timeout) = args.timeout {
            self.client.timeout_seconds = timeout;
        }

        if args.no_code {
            self.report.include_code = false;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
