//! Issue aggregation and scoring.
//!
//! Pure functions over already-loaded snapshots: grouped counts for the
//! charts and the weighted impact score.

use crate::models::{CountTable, Issue, Snapshot};

/// Count issues by type. Keys appear in first-seen order.
pub fn group_by_type(issues: &[Issue]) -> CountTable {
    let mut grouped = CountTable::new();

    for issue in issues {
        grouped.increment(&issue.issue_type);
    }

    grouped
}

/// Count issues per snapshot, oldest first.
///
/// The input order does not matter; output is ascending by ordinal so a
/// time series reads left to right.
pub fn group_by_report(snapshots: &[Snapshot]) -> CountTable {
    let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| s.ordinal);

    let mut grouped = CountTable::new();
    for snapshot in ordered {
        grouped.insert(&snapshot.name, snapshot.issue_count());
    }

    grouped
}

/// Weighted impact score in `[0, 100]`.
///
/// Weights are minor 1, serious 2, critical 3; issues of unknown impact
/// are left out entirely. Each weighted issue adds the same weight to the
/// score and to the total, so the result is 100 whenever at least one
/// weighted issue exists and 0 otherwise.
// TODO: confirm with product whether this should be proportional
// (weight sum / (count * 3)) before changing the formula.
pub fn compute_impact_score(issues: &[Issue]) -> u8 {
    let mut total_score: u32 = 0;
    let mut total_weight: u32 = 0;

    for weight in issues.iter().filter_map(|i| i.impact.weight()) {
        total_score += weight;
        total_weight += weight;
    }

    if total_weight == 0 {
        return 0;
    }

    let score = (f64::from(total_score) / f64::from(total_weight)) * 100.0;
    score.round().clamp(0.0, 100.0) as u8
}

/// Total number of issues across snapshots.
pub fn total_issues(snapshots: &[Snapshot]) -> usize {
    snapshots.iter().map(Snapshot::issue_count).sum()
}

/// The most recent snapshot of a newest-first history.
pub fn latest(snapshots: &[Snapshot]) -> Option<&Snapshot> {
    snapshots.first()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Impact;

    fn create_test_issue(issue_type: &str, impact: Impact) -> Issue {
        Issue {
            issue_type: issue_type.to_string(),
            impact,
            code: "<div></div>".to_string(),
            suggestion: "Fix it".to_string(),
            description: None,
            failure_summary: None,
            timestamp: None,
        }
    }

    fn create_test_snapshot(name: &str, ordinal: u64, count: usize) -> Snapshot {
        Snapshot {
            name: name.to_string(),
            ordinal,
            issues: (0..count)
                .map(|_| create_test_issue("A", Impact::Minor))
                .collect(),
        }
    }

    #[test]
    fn test_group_by_type() {
        let issues = vec![
            create_test_issue("A", Impact::Minor),
            create_test_issue("A", Impact::Serious),
            create_test_issue("B", Impact::Critical),
        ];

        let grouped = group_by_type(&issues);

        assert_eq!(grouped.keys(), vec!["A", "B"]);
        assert_eq!(grouped.get("A"), Some(2));
        assert_eq!(grouped.get("B"), Some(1));
    }

    #[test]
    fn test_group_by_type_first_seen_order() {
        let issues = vec![
            create_test_issue("zeta", Impact::Minor),
            create_test_issue("alpha", Impact::Minor),
            create_test_issue("zeta", Impact::Minor),
        ];

        assert_eq!(group_by_type(&issues).keys(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_group_by_report_ascending() {
        let snapshots = vec![
            create_test_snapshot("report-3", 3, 1),
            create_test_snapshot("report-2", 2, 4),
            create_test_snapshot("report-1", 1, 2),
        ];

        let grouped = group_by_report(&snapshots);

        assert_eq!(grouped.keys(), vec!["report-1", "report-2", "report-3"]);
        assert_eq!(grouped.values(), vec![2, 4, 1]);
    }

    #[test]
    fn test_group_by_report_includes_empty_snapshots() {
        let snapshots = vec![create_test_snapshot("report-1", 1, 0)];
        assert_eq!(group_by_report(&snapshots).get("report-1"), Some(0));
    }

    #[test]
    fn test_impact_score_empty() {
        assert_eq!(compute_impact_score(&[]), 0);
    }

    #[test]
    fn test_impact_score_unknown_only() {
        let issues = vec![create_test_issue("A", Impact::Unknown)];
        assert_eq!(compute_impact_score(&issues), 0);
    }

    #[test]
    fn test_impact_score_weighted() {
        assert_eq!(
            compute_impact_score(&[create_test_issue("A", Impact::Minor)]),
            100
        );
        assert_eq!(
            compute_impact_score(&[
                create_test_issue("A", Impact::Minor),
                create_test_issue("B", Impact::Critical),
            ]),
            100
        );
        assert_eq!(
            compute_impact_score(&[
                create_test_issue("A", Impact::Unknown),
                create_test_issue("B", Impact::Serious),
            ]),
            100
        );
    }

    #[test]
    fn test_total_and_latest() {
        let snapshots = vec![
            create_test_snapshot("report-2", 2, 3),
            create_test_snapshot("report-1", 1, 2),
        ];

        assert_eq!(total_issues(&snapshots), 5);
        assert_eq!(latest(&snapshots).map(|s| s.name.as_str()), Some("report-2"));
        assert!(latest(&[]).is_none());
    }
}
