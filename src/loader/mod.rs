//! Snapshot loading and validation.
//!
//! Issue records are validated here, at the load boundary: a bad record
//! is dropped, a bad snapshot is dropped, and only a missing website
//! aborts a history load.

use crate::models::{Issue, Snapshot, SnapshotId};
use crate::scanner;
use crate::store::{Store, StoreError};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Reasons a single snapshot could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The snapshot has no issue-list resource.
    #[error("snapshot has no issue list")]
    ResourceMissing,

    /// The issue list is not a JSON array.
    #[error("malformed issue list: {0}")]
    Malformed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parse and validate an issue list.
///
/// Fails with [`LoadError::Malformed`] if the bytes are not a JSON array.
/// Records that do not match the issue shape are dropped with a warning;
/// the rest are returned in file order.
pub fn parse_issues(bytes: &[u8]) -> Result<Vec<Issue>, LoadError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| LoadError::Malformed(e.to_string()))?;

    let Value::Array(records) = value else {
        return Err(LoadError::Malformed(
            "expected a JSON array of issues".to_string(),
        ));
    };

    let total = records.len();
    let issues: Vec<Issue> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Issue>(record) {
            Ok(issue) => Some(issue),
            Err(e) => {
                warn!("Dropping issue record {}: {}", index, e);
                None
            }
        })
        .collect();

    if issues.len() < total {
        debug!("Kept {}/{} issue records", issues.len(), total);
    }

    Ok(issues)
}

/// Load one snapshot's issues from the store.
pub fn load(store: &dyn Store, website_id: &str, id: &SnapshotId) -> Result<Snapshot, LoadError> {
    let bytes = store
        .read_snapshot_issues(website_id, &id.name)?
        .ok_or(LoadError::ResourceMissing)?;

    let issues = parse_issues(&bytes)?;
    Ok(Snapshot::new(id.clone(), issues))
}

/// Load a website's full history, newest first.
///
/// Snapshots that fail to load are logged and dropped; only a website
/// without a store location (or an unreadable listing) is an error.
pub fn load_history(store: &dyn Store, website_id: &str) -> Result<Vec<Snapshot>, StoreError> {
    let ids = scanner::scan(store, website_id)?;
    let mut snapshots = Vec::with_capacity(ids.len());

    for id in &ids {
        match load(store, website_id, id) {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(LoadError::ResourceMissing) => {
                info!("Skipping snapshot '{}': no issue list", id.name);
            }
            Err(e) => {
                warn!("Skipping snapshot '{}': {}", id.name, e);
            }
        }
    }

    info!(
        "Loaded {}/{} snapshots for {}",
        snapshots.len(),
        ids.len(),
        website_id
    );

    Ok(snapshots)
}
