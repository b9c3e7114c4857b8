//! Presentation adapter.
//!
//! Reshapes aggregation output into the structures the view layer
//! renders: chart series, segmented suggestions and per-snapshot detail.
//! Expand/collapse state is owned by the view and never appears here.

pub mod charts;
pub mod segments;

pub use charts::{ChartTheme, Distribution, TimeSeries};
pub use segments::{split_suggestion, Segment};

use crate::analysis::{compute_impact_score, latest, total_issues};
use crate::models::{Impact, Issue, IssueSummary, Snapshot};
use crate::store::ScreenshotLinks;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Display form of one issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueView {
    pub issue_type: String,
    pub impact: Impact,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub suggestion: Vec<Segment>,
}

impl From<&Issue> for IssueView {
    fn from(issue: &Issue) -> Self {
        Self {
            issue_type: issue.issue_type.clone(),
            impact: issue.impact,
            code: issue.code.clone(),
            description: issue.description.clone(),
            suggestion: split_suggestion(&issue.suggestion),
        }
    }
}

/// Display form of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    pub name: String,
    pub ordinal: u64,
    pub screenshot_url: String,
    pub issue_count: usize,
    pub impact_score: u8,
    pub issues: Vec<IssueView>,
}

impl SnapshotView {
    pub fn build(website_id: &str, snapshot: &Snapshot, links: &ScreenshotLinks) -> Self {
        Self {
            name: snapshot.name.clone(),
            ordinal: snapshot.ordinal,
            screenshot_url: links.url(website_id, &snapshot.name),
            issue_count: snapshot.issue_count(),
            impact_score: compute_impact_score(&snapshot.issues),
            issues: snapshot.issues.iter().map(IssueView::from).collect(),
        }
    }
}

/// Everything the history page needs for one website.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub website_id: String,
    pub generated_at: DateTime<Utc>,
    pub time_series: TimeSeries,
    /// Issue-type distribution of the latest snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,
    /// Name of the latest snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_report: Option<String>,
    /// Impact score of the latest snapshot.
    pub impact_score: u8,
    /// Summary of the latest snapshot.
    pub summary: IssueSummary,
    /// Issue count across all snapshots.
    pub total_issues: usize,
    /// Snapshots, newest first.
    pub snapshots: Vec<SnapshotView>,
}

impl HistoryView {
    /// Build the view from a newest-first history.
    pub fn build(
        website_id: &str,
        snapshots: &[Snapshot],
        links: &ScreenshotLinks,
        theme: &ChartTheme,
    ) -> Self {
        let newest = latest(snapshots);
        let newest_issues: &[Issue] = newest.map(|s| s.issues.as_slice()).unwrap_or_default();

        Self {
            website_id: website_id.to_string(),
            generated_at: Utc::now(),
            time_series: TimeSeries::from_snapshots(snapshots, theme),
            distribution: Distribution::for_latest(snapshots, theme),
            latest_report: newest.map(|s| s.name.clone()),
            impact_score: compute_impact_score(newest_issues),
            summary: IssueSummary::from_issues(newest_issues),
            total_issues: total_issues(snapshots),
            snapshots: snapshots
                .iter()
                .map(|s| SnapshotView::build(website_id, s, links))
                .collect(),
        }
    }
}
