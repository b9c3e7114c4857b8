//! HTTP API over the report store.
//!
//! Routes:
//!   GET /health
//!   GET /api/reports?website_id=<id>
//!   GET /api/history?website_id=<id>
//!   GET /api/report?report_path=<path>

mod error;
mod handlers;

use crate::config::Config;
use crate::presentation::ChartTheme;
use crate::store::{ScreenshotLinks, Store};
use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Immutable state shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    pub theme: Arc<ChartTheme>,
    pub links: Arc<ScreenshotLinks>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let theme = ChartTheme::from(&config.report);
        let links = ScreenshotLinks::from(&config.store);

        Self {
            store,
            config: Arc::new(config),
            theme: Arc::new(theme),
            links: Arc::new(links),
        }
    }
}

/// Build the API router.
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/reports", get(handlers::get_reports))
        .route("/api/history", get(handlers::get_history))
        .route("/api/report", get(handlers::get_report))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState) -> Result<()> {
    let bind = state.config.server.bind.clone();
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!("Serving report history on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed
        std::future::pending::<()>().await;
    }
}
