//! Chart-ready series built from aggregation output.

use crate::analysis::{group_by_report, group_by_type, latest};
use crate::models::{Issue, Snapshot};
use serde::Serialize;

/// Styling shared by the chart builders.
///
/// Built once by the presentation boundary and passed to each builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartTheme {
    /// Line color of the issues-over-time series.
    pub line_color: String,
    /// Curve tension of the issues-over-time series.
    pub line_tension: f64,
    /// Slice colors of the distribution, cycled when there are more types.
    pub palette: Vec<String>,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            line_color: "rgba(75,192,192,1)".to_string(),
            line_tension: 0.4,
            palette: default_palette(),
        }
    }
}

pub fn default_palette() -> Vec<String> {
    vec![
        "#FF6384", "#36A2EB", "#FFCE56", "#8A8A8A", "#FF8A8A", "#8AC688", "#A388FF", "#FF8ACC",
        "#FFD180", "#8AFFCC",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl From<&crate::config::ReportConfig> for ChartTheme {
    fn from(config: &crate::config::ReportConfig) -> Self {
        let palette = if config.palette.is_empty() {
            default_palette()
        } else {
            config.palette.clone()
        };

        Self {
            line_color: config.line_color.clone(),
            line_tension: config.line_tension,
            palette,
        }
    }
}

/// Issues over time: snapshot names oldest first against issue counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub border_color: String,
    pub tension: f64,
}

impl TimeSeries {
    pub fn from_snapshots(snapshots: &[Snapshot], theme: &ChartTheme) -> Self {
        let grouped = group_by_report(snapshots);

        Self {
            label: "Number of Issues".to_string(),
            labels: grouped.keys(),
            values: grouped.values(),
            border_color: theme.line_color.clone(),
            tension: theme.line_tension,
        }
    }
}

/// Distribution of issue types within one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    /// Snapshot the distribution was taken from, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub background_colors: Vec<String>,
}

impl Distribution {
    pub fn from_issues(issues: &[Issue], theme: &ChartTheme) -> Self {
        let grouped = group_by_type(issues);
        let background_colors = theme
            .palette
            .iter()
            .cycle()
            .take(grouped.len())
            .cloned()
            .collect();

        Self {
            report_name: None,
            labels: grouped.keys(),
            values: grouped.values(),
            background_colors,
        }
    }

    /// Distribution of the most recent snapshot of a newest-first history.
    pub fn for_latest(snapshots: &[Snapshot], theme: &ChartTheme) -> Option<Self> {
        let snapshot = latest(snapshots)?;

        Some(Self {
            report_name: Some(snapshot.name.clone()),
            ..Self::from_issues(&snapshot.issues, theme)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Impact;

    fn issue(issue_type: &str) -> Issue {
        Issue {
            issue_type: issue_type.to_string(),
            impact: Impact::Serious,
            code: String::new(),
            suggestion: String::new(),
            description: None,
            failure_summary: None,
            timestamp: None,
        }
    }

    fn history() -> Vec<Snapshot> {
        vec![
            Snapshot {
                name: "report-2".to_string(),
                ordinal: 2,
                issues: vec![issue("label"), issue("contrast"), issue("label")],
            },
            Snapshot {
                name: "report-1".to_string(),
                ordinal: 1,
                issues: vec![issue("contrast")],
            },
        ]
    }

    #[test]
    fn test_time_series_reads_oldest_first() {
        let series = TimeSeries::from_snapshots(&history(), &ChartTheme::default());

        assert_eq!(series.labels, vec!["report-1", "report-2"]);
        assert_eq!(series.values, vec![1, 3]);
        assert_eq!(series.label, "Number of Issues");
        assert_eq!(series.border_color, "rgba(75,192,192,1)");
    }

    #[test]
    fn test_distribution_for_latest() {
        let dist = Distribution::for_latest(&history(), &ChartTheme::default()).unwrap();

        assert_eq!(dist.report_name.as_deref(), Some("report-2"));
        assert_eq!(dist.labels, vec!["label", "contrast"]);
        assert_eq!(dist.values, vec![2, 1]);
        assert_eq!(dist.background_colors, vec!["#FF6384", "#36A2EB"]);
    }

    #[test]
    fn test_distribution_for_empty_history() {
        assert!(Distribution::for_latest(&[], &ChartTheme::default()).is_none());
    }

    #[test]
    fn test_distribution_cycles_palette() {
        let theme = ChartTheme {
            palette: vec!["#000".to_string(), "#fff".to_string()],
            ..ChartTheme::default()
        };
        let issues = vec![issue("a"), issue("b"), issue("c")];

        let dist = Distribution::from_issues(&issues, &theme);
        assert_eq!(dist.background_colors, vec!["#000", "#fff", "#000"]);
    }
}
