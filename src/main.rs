//! a11yhistory - Accessibility audit history for monitored websites
//!
//! Serves the report history API over a store of audit snapshots, or
//! renders a website's history (locally or from a remote server) and
//! single issue lists as Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing website, unreadable report, fetch failure, etc.)

mod analysis;
mod cli;
mod client;
mod config;
mod loader;
mod models;
mod presentation;
mod report;
mod scanner;
mod server;
mod store;

use anyhow::{bail, Context, Result};
use cli::{Args, Mode, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::Snapshot;
use presentation::{ChartTheme, HistoryView};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use store::{FsStore, FsStoreConfig, ScreenshotLinks, StoreError};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mode = args.mode();

    // Handle --init-config early (no logging needed)
    if mode == Mode::InitConfig {
        return handle_init_config();
    }

    // Load configuration before logging so [general] verbose applies
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, &config);

    info!("a11yhistory v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    if let Err(e) = run(mode, &args, config).await {
        error!("{:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .a11yhistory.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the store location, server address, and chart colors.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch the selected mode.
async fn run(mode: Mode, args: &Args, config: Config) -> Result<()> {
    match mode {
        Mode::Serve => run_server(config).await,
        Mode::History { website_id, remote } => {
            let snapshots = match remote {
                Some(ref base_url) => fetch_history(base_url, &website_id, args, &config).await?,
                None => load_local_history(&website_id, &config).await?,
            };
            render_history(&website_id, &snapshots, args, &config)
        }
        Mode::View(path) => render_issue_list(&path, args, &config),
        Mode::InitConfig => handle_init_config(),
    }
}

/// Serve the HTTP API over the local store.
async fn run_server(config: Config) -> Result<()> {
    let store = FsStore::new(FsStoreConfig::from(&config.store));
    if !store.root().is_dir() {
        warn!(
            "Reports directory {} does not exist; every website will be reported as not found",
            store.root().display()
        );
    }

    let state = server::AppState::new(Arc::new(store), config);
    server::serve(state).await
}

/// Load a website's history from the local store.
async fn load_local_history(website_id: &str, config: &Config) -> Result<Vec<Snapshot>> {
    let store = FsStore::new(FsStoreConfig::from(&config.store));
    info!("Loading history for {} from {}", website_id, store.root().display());

    let owned_id = website_id.to_string();
    let history = tokio::task::spawn_blocking(move || loader::load_history(&store, &owned_id))
        .await
        .context("History task failed")?;

    match history {
        Ok(snapshots) => Ok(snapshots),
        Err(StoreError::NotFound(_)) => bail!("No reports found for website '{}'", website_id),
        Err(e) => Err(e).context("Failed to read the report store"),
    }
}

/// Fetch a website's history from a running server.
async fn fetch_history(
    base_url: &str,
    website_id: &str,
    args: &Args,
    config: &Config,
) -> Result<Vec<Snapshot>> {
    let client =
        client::ReportsClient::new(base_url, config.client.timeout_seconds, !args.quiet)
            .context("Failed to create HTTP client")?;

    let entries = client
        .fetch_reports(website_id)
        .await
        .with_context(|| format!("Failed to fetch reports from {}", base_url))?;

    Ok(client::into_snapshots(entries))
}

/// Render a history view in the requested format.
fn render_history(
    website_id: &str,
    snapshots: &[Snapshot],
    args: &Args,
    config: &Config,
) -> Result<()> {
    let links = ScreenshotLinks::from(&config.store);
    let theme = ChartTheme::from(&config.report);
    let view = HistoryView::build(website_id, snapshots, &links, &theme);

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&view)?,
        OutputFormat::Markdown => report::generate_markdown_report(&view, &config.report),
    };
    write_output(&output, args.output.as_deref())?;

    if !args.quiet && args.output.is_some() {
        println!("\n📊 History Summary:");
        println!("   Website: {}", website_id);
        println!("   Reports: {}", view.snapshots.len());
        if let Some(ref latest) = view.latest_report {
            println!("   Latest: {} ({} issues)", latest, view.summary.total);
            println!(
                "   - 🔴 Critical: {} | 🟠 Serious: {} | 🟢 Minor: {} | ⚪ Unknown: {}",
                view.summary.critical, view.summary.serious, view.summary.minor, view.summary.unknown
            );
        }
    }

    Ok(())
}

/// Render a single issue-list file.
fn render_issue_list(path: &Path, args: &Args, config: &Config) -> Result<()> {
    info!("Rendering report {}", path.display());

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read report {}", path.display()))?;
    let issues = loader::parse_issues(&bytes)
        .with_context(|| format!("Failed to parse report {}", path.display()))?;

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&issues)?,
        OutputFormat::Markdown => report::generate_markdown_issue_list(
            &path.display().to_string(),
            &issues,
            &config.report,
        ),
    };

    write_output(&output, args.output.as_deref())
}

/// Write rendered output to a file, or stdout when no file is given.
fn write_output(output: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Returns the config and the file it came from, if any.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Ok((Config::load(config_path)?, Some(config_path.clone())));
    }

    // Try default location
    Ok(match Config::load_default()? {
        Some(config) => (config, Some(PathBuf::from(CONFIG_FILE))),
        None => (Config::default(), None),
    })
}
