//! Data models for the accessibility history pipeline.
//!
//! This module contains the core data structures shared by the store,
//! loader, aggregation and presentation layers: issues, snapshots,
//! the API wire shape and ordered count tables.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Severity of an accessibility finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Minor impact - cosmetic or low-friction barriers
    Minor,
    /// Serious impact - significant barriers for some users
    Serious,
    /// Critical impact - blocks access to content or functionality
    Critical,
    /// Absent or unrecognized impact
    #[default]
    Unknown,
}

impl Impact {
    /// Score weight of this impact level. `Unknown` carries no weight.
    pub fn weight(&self) -> Option<u32> {
        match self {
            Impact::Minor => Some(1),
            Impact::Serious => Some(2),
            Impact::Critical => Some(3),
            Impact::Unknown => None,
        }
    }

    /// Normalize a JSON value from an issue record into an impact level.
    fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_str)
            .map(Impact::from)
            .unwrap_or_default()
    }
}

impl From<&str> for Impact {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "minor" => Impact::Minor,
            "serious" => Impact::Serious,
            "critical" => Impact::Critical,
            _ => Impact::Unknown,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Impact::Minor => write!(f, "minor"),
            Impact::Serious => write!(f, "serious"),
            Impact::Critical => write!(f, "critical"),
            Impact::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single accessibility finding within a snapshot.
///
/// Serialized with the field names the audit tool writes, so issues
/// pass through the API in the same shape they have on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "IssueRecord")]
pub struct Issue {
    /// Rule or category label (e.g. `color-contrast`).
    pub issue_type: String,
    /// Normalized severity.
    pub impact: Impact,
    /// Source markup implicated by the finding.
    pub code: String,
    /// Remediation text, possibly with fenced code blocks.
    #[serde(rename = "llm_suggestions")]
    pub suggestion: String,
    /// Rule description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Per-node failure summaries.
    #[serde(rename = "failureSummary", skip_serializing_if = "Option::is_none")]
    pub failure_summary: Option<String>,
    /// Audit run timestamp as written by the audit tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// `code` is written either as one string or as a list of snippets.
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeField {
    Text(String),
    Snippets(Vec<String>),
}

impl From<CodeField> for String {
    fn from(code: CodeField) -> Self {
        match code {
            CodeField::Text(text) => text,
            CodeField::Snippets(snippets) => snippets.join("\n\n"),
        }
    }
}

/// Minimal record shape accepted from the store: `issue_type`, `code` and
/// `suggestion` are required, everything else is optional.
#[derive(Deserialize)]
struct IssueRecord {
    #[serde(alias = "issueType")]
    issue_type: String,
    #[serde(alias = "codeSnippet")]
    code: CodeField,
    #[serde(rename = "llm_suggestions", alias = "suggestion")]
    suggestion: String,
    #[serde(default)]
    impact: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default, rename = "failureSummary", alias = "failure_summary")]
    failure_summary: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
}

fn optional_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl From<IssueRecord> for Issue {
    fn from(record: IssueRecord) -> Self {
        Self {
            issue_type: record.issue_type,
            impact: Impact::from_value(record.impact.as_ref()),
            code: record.code.into(),
            suggestion: record.suggestion,
            description: optional_text(record.description),
            failure_summary: optional_text(record.failure_summary),
            timestamp: optional_text(record.timestamp),
        }
    }
}

/// Identifier of a snapshot discovered in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotId {
    /// Store-relative name, e.g. `report-3`.
    pub name: String,
    /// Chronological ordinal parsed from the name.
    pub ordinal: u64,
}

/// One audit run for a website, with its validated issues in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub name: String,
    pub ordinal: u64,
    pub issues: Vec<Issue>,
}

impl Snapshot {
    /// Creates a snapshot from its identifier and loaded issues.
    pub fn new(id: SnapshotId, issues: Vec<Issue>) -> Self {
        Self {
            name: id.name,
            ordinal: id.ordinal,
            issues,
        }
    }

    /// Number of issues in this snapshot.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

/// API wire shape of a snapshot: `{reportName, issues}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(rename = "reportName")]
    pub report_name: String,
    pub issues: Vec<Issue>,
}

impl From<Snapshot> for ReportEntry {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            report_name: snapshot.name,
            issues: snapshot.issues,
        }
    }
}

/// Insertion-ordered `label -> count` table.
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountTable {
    entries: Vec<(String, usize)>,
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to `label`, appending it if unseen.
    pub fn increment(&mut self, label: &str) {
        match self.entries.iter_mut().find(|(key, _)| key == label) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((label.to_string(), 1)),
        }
    }

    /// Set the count for `label`, appending it if unseen.
    pub fn insert(&mut self, label: &str, count: usize) {
        match self.entries.iter_mut().find(|(key, _)| key == label) {
            Some((_, existing)) => *existing = count,
            None => self.entries.push((label.to_string(), count)),
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn values(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, count)| *count).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }
}

impl Serialize for CountTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Summary of issues by impact and type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueSummary {
    /// Total number of issues.
    pub total: usize,
    pub critical: usize,
    pub serious: usize,
    pub minor: usize,
    /// Issues with absent or unrecognized impact.
    pub unknown: usize,
    /// Issues grouped by type, in first-seen order.
    pub by_type: CountTable,
}

impl IssueSummary {
    /// Creates a summary from a list of issues.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Self {
            total: issues.len(),
            ..Self::default()
        };

        for issue in issues {
            match issue.impact {
                Impact::Critical => summary.critical += 1,
                Impact::Serious => summary.serious += 1,
                Impact::Minor => summary.minor += 1,
                Impact::Unknown => summary.unknown += 1,
            }

            summary.by_type.increment(&issue.issue_type);
        }

        summary
    }
}
