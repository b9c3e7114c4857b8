//! HTTP handlers.

use super::error::ApiError;
use super::AppState;
use crate::loader::{self, LoadError};
use crate::models::{Issue, ReportEntry, Snapshot};
use crate::presentation::HistoryView;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct WebsiteQuery {
    pub website_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub report_path: Option<String>,
}

/// An absent or empty parameter counts as missing.
fn required(value: Option<String>, name: &'static str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingParameter(name))
}

/// Run the history pipeline off the async runtime; store reads block.
async fn load_snapshots(state: &AppState, website_id: String) -> Result<Vec<Snapshot>, ApiError> {
    let store = Arc::clone(&state.store);

    let history = tokio::task::spawn_blocking(move || {
        loader::load_history(store.as_ref(), &website_id)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("history task failed: {}", e)))??;

    Ok(history)
}

pub async fn health() -> impl IntoResponse {
    "ok"
}

/// GET /api/reports?website_id=<id> - snapshots with their issues, newest first
pub async fn get_reports(
    State(state): State<AppState>,
    query: Result<Query<WebsiteQuery>, QueryRejection>,
) -> Result<Json<Vec<ReportEntry>>, ApiError> {
    let Query(query) = query?;
    let website_id = required(query.website_id, "website_id")?;
    debug!("Listing reports for {}", website_id);

    let snapshots = load_snapshots(&state, website_id).await?;
    Ok(Json(snapshots.into_iter().map(ReportEntry::from).collect()))
}

/// GET /api/history?website_id=<id> - chart-ready history view
pub async fn get_history(
    State(state): State<AppState>,
    query: Result<Query<WebsiteQuery>, QueryRejection>,
) -> Result<Json<HistoryView>, ApiError> {
    let Query(query) = query?;
    let website_id = required(query.website_id, "website_id")?;
    let snapshots = load_snapshots(&state, website_id.clone()).await?;

    Ok(Json(HistoryView::build(
        &website_id,
        &snapshots,
        &state.links,
        &state.theme,
    )))
}

/// GET /api/report?report_path=<path> - a single issue list, outside the
/// website/snapshot model
pub async fn get_report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let Query(query) = query?;
    let report_path = required(query.report_path, "report_path")?;
    let store = Arc::clone(&state.store);

    let issues = tokio::task::spawn_blocking(move || -> Result<Vec<Issue>, ApiError> {
        let bytes = store
            .read_resource(&report_path)?
            .ok_or(ApiError::ReportNotFound)?;

        loader::parse_issues(&bytes).map_err(|e| match e {
            LoadError::Malformed(detail) => {
                warn!("Malformed report {}: {}", report_path, detail);
                ApiError::MalformedReport
            }
            other => ApiError::Internal(other.to_string()),
        })
    })
    .await
    .map_err(|e| ApiError::Internal(format!("report task failed: {}", e)))??;

    Ok(Json(issues))
}
