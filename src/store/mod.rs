//! Read-only report store.
//!
//! The scanner, loader and server only talk to the [`Store`] trait, so the
//! filesystem layout can be swapped for an in-memory store in tests.

pub mod fs;
#[cfg(test)]
pub mod memory;

pub use fs::{FsStore, FsStoreConfig};
#[cfg(test)]
pub use memory::MemoryStore;

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Fixed name of the issue-list resource inside a snapshot.
pub const DEFAULT_ISSUES_FILE: &str = "focused_accessibility_issues.json";

/// Fixed name of the screenshot inside a snapshot.
pub const DEFAULT_SCREENSHOT_FILE: &str = "full_page_screenshot.png";

/// Errors raised by store access.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The website has no store location at all.
    #[error("no reports found for website '{0}'")]
    NotFound(String),

    /// A resource path escapes the store root.
    #[error("invalid resource path: {0}")]
    InvalidPath(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Capability over the externally populated report hierarchy
/// `website -> snapshot -> issue list`.
pub trait Store: Send + Sync {
    /// Names of the snapshot containers under a website, in no particular
    /// order. Stray files are not containers and are never returned.
    fn list_snapshots(&self, website_id: &str) -> Result<Vec<String>, StoreError>;

    /// Raw bytes of a snapshot's issue list, or `None` if it is absent.
    fn read_snapshot_issues(
        &self,
        website_id: &str,
        snapshot: &str,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    /// Raw bytes of a resource addressed by a store-relative path.
    fn read_resource(&self, relative_path: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

/// Public locations of snapshot screenshots.
///
/// Screenshots are served by a separate static file server; the pipeline
/// only links to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotLinks {
    /// URL prefix under which the store root is exposed.
    pub base_url: String,
    /// Screenshot file name inside each snapshot.
    pub file_name: String,
}

impl Default for ScreenshotLinks {
    fn default() -> Self {
        Self {
            base_url: "/reports".to_string(),
            file_name: DEFAULT_SCREENSHOT_FILE.to_string(),
        }
    }
}

impl From<&crate::config::StoreConfig> for ScreenshotLinks {
    fn from(config: &crate::config::StoreConfig) -> Self {
        Self {
            base_url: config.screenshot_base_url.clone(),
            file_name: config.screenshot_file.clone(),
        }
    }
}

impl ScreenshotLinks {
    /// URL of a snapshot's full-page screenshot.
    pub fn url(&self, website_id: &str, snapshot: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            website_id,
            snapshot,
            self.file_name
        )
    }
}

/// Whether a website id can name a single directory under the store root.
pub fn is_valid_website_id(website_id: &str) -> bool {
    !website_id.is_empty()
        && website_id != "."
        && website_id != ".."
        && !website_id.contains(['/', '\\'])
}

/// Validate a store-relative path: no root, no prefix, no `..`.
pub fn relative_resource_path(relative_path: &str) -> Result<PathBuf, StoreError> {
    let path = Path::new(relative_path);
    let mut clean = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(StoreError::InvalidPath(relative_path.to_string()));
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(StoreError::InvalidPath(relative_path.to_string()));
    }

    Ok(clean)
}
