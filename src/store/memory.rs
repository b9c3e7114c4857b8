//! In-memory report store for tests.

use super::{relative_resource_path, Store, StoreError};
use std::collections::BTreeMap;

/// A store held entirely in memory.
///
/// Snapshots with no issue list are modelled as `None` contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    websites: BTreeMap<String, BTreeMap<String, Option<Vec<u8>>>>,
    resources: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a website with no snapshots.
    pub fn with_website(mut self, website_id: &str) -> Self {
        self.websites.entry(website_id.to_string()).or_default();
        self
    }

    /// Register a snapshot holding `issues` as its issue-list resource.
    pub fn with_snapshot(mut self, website_id: &str, snapshot: &str, issues: &str) -> Self {
        self.websites
            .entry(website_id.to_string())
            .or_default()
            .insert(snapshot.to_string(), Some(issues.as_bytes().to_vec()));
        self
    }

    /// Register a snapshot container without an issue-list resource.
    pub fn with_empty_snapshot(mut self, website_id: &str, snapshot: &str) -> Self {
        self.websites
            .entry(website_id.to_string())
            .or_default()
            .insert(snapshot.to_string(), None);
        self
    }

    /// Register a standalone resource by store-relative path.
    pub fn with_resource(mut self, path: &str, contents: &str) -> Self {
        self.resources
            .insert(path.to_string(), contents.as_bytes().to_vec());
        self
    }
}

impl Store for MemoryStore {
    fn list_snapshots(&self, website_id: &str) -> Result<Vec<String>, StoreError> {
        self.websites
            .get(website_id)
            .map(|snapshots| snapshots.keys().cloned().collect())
            .ok_or_else(|| StoreError::NotFound(website_id.to_string()))
    }

    fn read_snapshot_issues(
        &self,
        website_id: &str,
        snapshot: &str,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let snapshots = self
            .websites
            .get(website_id)
            .ok_or_else(|| StoreError::NotFound(website_id.to_string()))?;

        Ok(snapshots.get(snapshot).cloned().flatten())
    }

    fn read_resource(&self, relative_path: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let key = relative_resource_path(relative_path)?;
        Ok(self
            .resources
            .get(key.to_string_lossy().as_ref())
            .cloned())
    }
}
