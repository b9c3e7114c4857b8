//! Markdown and JSON report generation.
//!
//! This module renders a website's history, or a single issue list, as a
//! standalone document.

use crate::analysis::{compute_impact_score, group_by_type};
use crate::config::ReportConfig;
use crate::models::{Issue, IssueSummary};
use crate::presentation::{HistoryView, IssueView, Segment, SnapshotView};
use anyhow::Result;
use serde::Serialize;

/// Generate a Markdown report of a website's history.
pub fn generate_markdown_report(view: &HistoryView, options: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Web Accessibility Report\n\n");

    output.push_str(&generate_metadata_section(view));
    output.push_str(&generate_trend_section(view));
    output.push_str(&generate_distribution_section(view));
    output.push_str(&generate_summary_section(&view.summary));

    // Snapshots, newest first
    output.push_str("## Reports\n\n");
    if view.snapshots.is_empty() {
        output.push_str("No reports found. Please run the audit to generate a new report.\n\n");
    }
    for snapshot in &view.snapshots {
        output.push_str(&generate_snapshot_section(snapshot, options));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a Markdown report of a single issue list.
pub fn generate_markdown_issue_list(source: &str, issues: &[Issue], options: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str("# Accessibility Report\n\n");
    output.push_str(&format!("- **Source:** `{}`\n", source));
    output.push_str(&format!("- **Issues:** {}\n", issues.len()));
    output.push_str(&format!(
        "- **Impact Score:** {}\n\n",
        compute_impact_score(issues)
    ));

    let by_type = group_by_type(issues);
    if !by_type.is_empty() {
        output.push_str("## Issues by Type\n\n");
        output.push_str("| Issue Type | Count |\n");
        output.push_str("|:---|:---:|\n");
        for (issue_type, count) in by_type.iter() {
            output.push_str(&format!("| {} | {} |\n", issue_type, count));
        }
        output.push('\n');
    }

    output.push_str("## Issues\n\n");
    for issue in issues {
        output.push_str(&generate_issue_block(&IssueView::from(issue), options));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(view: &HistoryView) -> String {
    let mut section = String::new();

    section.push_str(&format!("- **Website:** `{}`\n", view.website_id));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        view.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Reports:** {}\n", view.snapshots.len()));
    if let Some(ref latest) = view.latest_report {
        section.push_str(&format!("- **Latest Report:** {}\n", latest));
    }
    section.push_str(&format!("- **Impact Score:** {}\n", view.impact_score));
    section.push_str(&format!(
        "- **Total Issues (all reports):** {}\n\n",
        view.total_issues
    ));

    section
}

/// Generate the issues-over-time table.
fn generate_trend_section(view: &HistoryView) -> String {
    let series = &view.time_series;
    if series.labels.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Issues Over Time\n\n");
    section.push_str("| Report | Issues |\n");
    section.push_str("|:---|:---:|\n");
    for (label, value) in series.labels.iter().zip(&series.values) {
        section.push_str(&format!("| {} | {} |\n", label, value));
    }
    section.push('\n');

    section
}

/// Generate the issue-type distribution of the latest report.
fn generate_distribution_section(view: &HistoryView) -> String {
    let Some(ref dist) = view.distribution else {
        return String::new();
    };
    if dist.labels.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Distribution of Issues\n\n");
    section.push_str("| Issue Type | Count |\n");
    section.push_str("|:---|:---:|\n");
    for (label, value) in dist.labels.iter().zip(&dist.values) {
        section.push_str(&format!("| {} | {} |\n", label, value));
    }
    section.push('\n');

    section
}

/// Generate the impact breakdown of the latest report.
fn generate_summary_section(summary: &IssueSummary) -> String {
    if summary.total == 0 {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Impact Breakdown\n\n");
    section.push_str("| Critical | Serious | Minor | Unknown | **Total** |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | **{}** |\n\n",
        summary.critical, summary.serious, summary.minor, summary.unknown, summary.total
    ));

    section
}

/// Generate the section for a single report.
fn generate_snapshot_section(snapshot: &SnapshotView, options: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str(&format!("### {}\n\n", snapshot.name));
    section.push_str(&format!(
        "*Issues: {} | Impact Score: {}* | [View Report Screenshot]({})\n\n",
        snapshot.issue_count, snapshot.impact_score, snapshot.screenshot_url
    ));

    for issue in &snapshot.issues {
        section.push_str(&generate_issue_block(issue, options));
    }

    section
}

/// Generate a single issue block.
fn generate_issue_block(issue: &IssueView, options: &ReportConfig) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "#### Issue Type: {} ({})\n\n",
        issue.issue_type, issue.impact
    ));

    if let Some(ref description) = issue.description {
        block.push_str(&format!("**Description:** {}\n\n", description));
    }

    if options.include_code && !issue.code.is_empty() {
        block.push_str("**Code:**\n\n```html\n");
        block.push_str(issue.code.trim_end());
        block.push_str("\n```\n\n");
    }

    if options.include_suggestions && !issue.suggestion.is_empty() {
        block.push_str("**Recommendations:**\n\n");
        block.push_str(&render_segments(&issue.suggestion));
        block.push_str("\n\n");
    }

    block.push_str("---\n\n");

    block
}

/// Render suggestion segments, normalizing code blocks onto their own lines.
fn render_segments(segments: &[Segment]) -> String {
    let mut rendered = String::new();

    for segment in segments {
        match segment.code_parts() {
            Some((language, body)) => {
                if !rendered.is_empty() && !rendered.ends_with('\n') {
                    rendered.push('\n');
                }
                rendered.push_str(&format!(
                    "```{}\n{}\n```\n",
                    language.unwrap_or("html"),
                    body.trim_matches('\n')
                ));
            }
            None => rendered.push_str(segment.text()),
        }
    }

    rendered.trim_end().to_string()
}

/// Generate the report footer.
fn generate_footer() -> String {
    "*Report generated by a11yhistory*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
