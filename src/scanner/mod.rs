//! Snapshot scanner for discovering and ordering a website's audit runs.
//!
//! Snapshot names encode a chronological ordinal (`report-3`). Entries
//! without a parsable ordinal are skipped with a warning rather than
//! failing the whole listing.

use crate::models::SnapshotId;
use crate::store::{Store, StoreError};
use tracing::{debug, warn};

/// Parse the ordinal out of a snapshot name.
///
/// The ordinal is the leading run of digits in the second `-`-separated
/// part of the name: `report-12` is 12, `report-3-rerun` is 3, and
/// `report-abc` or `report` have none.
pub fn parse_ordinal(name: &str) -> Option<u64> {
    let part = name.split('-').nth(1)?;
    let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return None;
    }

    digits.parse().ok()
}

/// List a website's snapshots, newest first.
///
/// Fails with [`StoreError::NotFound`] if the website has no store
/// location at all.
pub fn scan(store: &dyn Store, website_id: &str) -> Result<Vec<SnapshotId>, StoreError> {
    let names = store.list_snapshots(website_id)?;
    debug!("Found {} snapshot entries for {}", names.len(), website_id);

    let mut ids: Vec<SnapshotId> = names
        .into_iter()
        .filter_map(|name| match parse_ordinal(&name) {
            Some(ordinal) => Some(SnapshotId { name, ordinal }),
            None => {
                warn!(
                    "Skipping snapshot '{}' for {}: name has no ordinal",
                    name, website_id
                );
                None
            }
        })
        .collect();

    // Newest first; ties broken by name so the order is deterministic
    ids.sort_by(|a, b| b.ordinal.cmp(&a.ordinal).then_with(|| a.name.cmp(&b.name)));

    for pair in ids.windows(2) {
        if pair[0].ordinal == pair[1].ordinal {
            warn!(
                "Snapshots '{}' and '{}' share ordinal {} for {}",
                pair[0].name, pair[1].name, pair[0].ordinal, website_id
            );
        }
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn names(ids: &[SnapshotId]) -> Vec<&str> {
        ids.iter().map(|id| id.name.as_str()).collect()
    }

    #[test]
    fn test_parse_ordinal() {
        assert_eq!(parse_ordinal("report-1"), Some(1));
        assert_eq!(parse_ordinal("report-12"), Some(12));
        assert_eq!(parse_ordinal("report-3-rerun"), Some(3));
        assert_eq!(parse_ordinal("report-7b"), Some(7));
        assert_eq!(parse_ordinal("report-abc"), None);
        assert_eq!(parse_ordinal("report"), None);
        assert_eq!(parse_ordinal("report-"), None);
    }

    #[test]
    fn test_scan_orders_newest_first() {
        let store = MemoryStore::new()
            .with_snapshot("site", "report-3", "[]")
            .with_snapshot("site", "report-1", "[]")
            .with_snapshot("site", "report-2", "[]");

        let ids = scan(&store, "site").unwrap();
        assert_eq!(names(&ids), vec!["report-3", "report-2", "report-1"]);
        assert_eq!(ids[0].ordinal, 3);
    }

    #[test]
    fn test_scan_orders_numerically_not_lexically() {
        let store = MemoryStore::new()
            .with_snapshot("site", "report-9", "[]")
            .with_snapshot("site", "report-10", "[]");

        let ids = scan(&store, "site").unwrap();
        assert_eq!(names(&ids), vec!["report-10", "report-9"]);
    }

    #[test]
    fn test_scan_skips_unparsable_names() {
        let store = MemoryStore::new()
            .with_snapshot("site", "report-abc", "[]")
            .with_snapshot("site", "report-1", "[]");

        let ids = scan(&store, "site").unwrap();
        assert_eq!(names(&ids), vec!["report-1"]);
    }

    #[test]
    fn test_scan_breaks_ordinal_ties_by_name() {
        let store = MemoryStore::new()
            .with_snapshot("site", "report-02", "[]")
            .with_snapshot("site", "report-2", "[]");

        let ids = scan(&store, "site").unwrap();
        assert_eq!(names(&ids), vec!["report-02", "report-2"]);
    }

    #[test]
    fn test_scan_missing_website() {
        let store = MemoryStore::new();
        assert!(matches!(scan(&store, "site"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_scan_empty_website() {
        let store = MemoryStore::new().with_website("site");
        assert!(scan(&store, "site").unwrap().is_empty());
    }
}
