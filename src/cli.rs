//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// a11yhistory - accessibility audit history for monitored websites
///
/// Serves the report history API over a directory of audit snapshots,
/// or renders a website's history and single reports as Markdown/JSON.
///
/// Examples:
///   a11yhistory --reports-dir ./public/reports --bind 0.0.0.0:3000
///   a11yhistory --website example_com
///   a11yhistory --url https://example.com --format json --output history.json
///   a11yhistory --website example_com --remote http://localhost:3000
///   a11yhistory --report-path ./focused_accessibility_issues.json
///   a11yhistory --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Root directory of the report store
    ///
    /// Holds one directory per website, each with report-N snapshots.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Address for the HTTP server to listen on
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Render the history of this website id instead of serving
    #[arg(short, long, value_name = "ID", conflicts_with = "url")]
    pub website: Option<String>,

    /// Render the history of the website audited at this URL
    ///
    /// The website id is derived from the URL's host the same way the
    /// audit tool names its report directories.
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Fetch the history from a running server instead of the local store
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,

    /// Render a single issue-list file (standalone report viewer)
    #[arg(long, value_name = "FILE", conflicts_with_all = ["website", "url", "remote"])]
    pub report_path: Option<PathBuf>,

    /// Output file for rendered reports (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Leave code snippets out of Markdown reports
    #[arg(long)]
    pub no_code: bool,

    /// Remote fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .a11yhistory.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .a11yhistory.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// What the invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Write a default config file.
    InitConfig,
    /// Render one issue-list file.
    View(PathBuf),
    /// Render a website's history, locally or from a remote server.
    History {
        website_id: String,
        remote: Option<String>,
    },
    /// Serve the HTTP API.
    Serve,
}

/// Derive a website id from a site URL: the authority exactly as written
/// (userinfo, host case and port kept), with every non-alphanumeric
/// character replaced by `_`.
pub fn website_id_from_url(url: &str) -> Result<String, String> {
    Url::parse(url).map_err(|e| format!("Invalid URL '{}': {}", url, e))?;

    let authority = url
        .split_once("://")
        .map(|(_, rest)| rest.split(['/', '?', '#']).next().unwrap_or_default())
        .unwrap_or_default();
    if authority.is_empty() {
        return Err(format!("URL has no host: {}", url));
    }

    Ok(authority
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect())
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref website) = self.website {
            if website.trim().is_empty() {
                return Err("Website id must not be empty".to_string());
            }
        }

        if let Some(ref url) = self.url {
            website_id_from_url(url)?;
        }

        // Validate remote URL format
        if let Some(ref remote) = self.remote {
            if !remote.starts_with("http://") && !remote.starts_with("https://") {
                return Err("Remote URL must start with 'http://' or 'https://'".to_string());
            }
            if self.website.is_none() && self.url.is_none() {
                return Err("--remote requires --website or --url".to_string());
            }
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate report file if provided
        if let Some(ref path) = self.report_path {
            if !path.is_file() {
                return Err(format!("Report file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// The mode selected by the flags. Call after [`Args::validate`].
    pub fn mode(&self) -> Mode {
        if self.init_config {
            return Mode::InitConfig;
        }

        if let Some(ref path) = self.report_path {
            return Mode::View(path.clone());
        }

        let website_id = self
            .website
            .clone()
            .or_else(|| self.url.as_deref().and_then(|u| website_id_from_url(u).ok()));

        match website_id {
            Some(website_id) => Mode::History {
                website_id,
                remote: self.remote.clone(),
            },
            None => Mode::Serve,
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
