//! Filesystem-backed report store.
//!
//! Layout: `<root>/<website_id>/<snapshot>/<issues_file>`.

use super::{is_valid_website_id, relative_resource_path, Store, StoreError, DEFAULT_ISSUES_FILE};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Filesystem store settings.
#[derive(Debug, Clone)]
pub struct FsStoreConfig {
    /// Root directory holding one directory per website.
    pub root: PathBuf,
    /// Issue-list file name inside each snapshot.
    pub issues_file: String,
}

impl Default for FsStoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public/reports"),
            issues_file: DEFAULT_ISSUES_FILE.to_string(),
        }
    }
}

impl From<&crate::config::StoreConfig> for FsStoreConfig {
    fn from(config: &crate::config::StoreConfig) -> Self {
        Self {
            root: config.reports_dir.clone(),
            issues_file: config.issues_file.clone(),
        }
    }
}

/// Report store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    config: FsStoreConfig,
}

impl FsStore {
    /// Create a new filesystem store.
    pub fn new(config: FsStoreConfig) -> Self {
        Self { config }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    fn website_dir(&self, website_id: &str) -> Option<PathBuf> {
        if !is_valid_website_id(website_id) {
            debug!("Rejecting website id {:?}", website_id);
            return None;
        }
        let dir = self.config.root.join(website_id);
        dir.is_dir().then_some(dir)
    }
}

/// Read a regular file. A missing path, or one that is not a regular file,
/// reads as `None`.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            debug!("Not a regular file: {}", path.display());
            return Ok(None);
        }
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(io_error(source)),
    }

    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(io_error(source)),
    }
}

impl Store for FsStore {
    fn list_snapshots(&self, website_id: &str) -> Result<Vec<String>, StoreError> {
        let dir = self
            .website_dir(website_id)
            .ok_or_else(|| StoreError::NotFound(website_id.to_string()))?;

        let mut names = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| StoreError::Io {
                path: dir.clone(),
                source: e.into(),
            })?;

            // Symlinks are not followed, so a link to a directory is not a container
            if !entry.file_type().is_dir() {
                debug!("Ignoring non-directory entry {}", entry.path().display());
                continue;
            }

            names.push(entry.file_name().to_string_lossy().to_string());
        }

        Ok(names)
    }

    fn read_snapshot_issues(
        &self,
        website_id: &str,
        snapshot: &str,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let Some(dir) = self.website_dir(website_id) else {
            return Err(StoreError::NotFound(website_id.to_string()));
        };
        if !is_valid_website_id(snapshot) {
            return Ok(None);
        }

        read_optional(&dir.join(snapshot).join(&self.config.issues_file))
    }

    fn read_resource(&self, relative_path: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let relative = relative_resource_path(relative_path)?;
        read_optional(&self.config.root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FsStore {
        FsStore::new(FsStoreConfig {
            root: dir.path().to_path_buf(),
            ..FsStoreConfig::default()
        })
    }

    #[test]
    fn test_list_snapshots_ignores_files() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("example_com");
        fs::create_dir_all(site.join("report-1")).unwrap();
        fs::create_dir_all(site.join("report-2")).unwrap();
        fs::write(site.join("notes.txt"), "stray").unwrap();

        let store = store_in(&dir);
        let mut names = store.list_snapshots("example_com").unwrap();
        names.sort();

        assert_eq!(names, vec!["report-1", "report-2"]);
    }

    #[test]
    fn test_list_snapshots_missing_website() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.list_snapshots("nowhere").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref id) if id == "nowhere"));
    }

    #[test]
    fn test_list_snapshots_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(matches!(
            store.list_snapshots(".."),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_read_snapshot_issues() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("example_com").join("report-1");
        fs::create_dir_all(&snapshot).unwrap();
        fs::write(snapshot.join(DEFAULT_ISSUES_FILE), "[]").unwrap();
        fs::create_dir_all(dir.path().join("example_com").join("report-2")).unwrap();

        let store = store_in(&dir);
        assert_eq!(
            store.read_snapshot_issues("example_com", "report-1").unwrap(),
            Some(b"[]".to_vec())
        );
        assert_eq!(
            store.read_snapshot_issues("example_com", "report-2").unwrap(),
            None
        );
    }

    #[test]
    fn test_read_resource() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("single.json"), "[]").unwrap();

        let store = store_in(&dir);
        assert_eq!(store.read_resource("single.json").unwrap(), Some(b"[]".to_vec()));
        assert_eq!(store.read_resource("missing.json").unwrap(), None);
        assert!(matches!(
            store.read_resource("../single.json"),
            Err(StoreError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_read_resource_directory_is_absent() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("site").join("report-1")).unwrap();

        let store = store_in(&dir);
        assert_eq!(store.read_resource("site/report-1").unwrap(), None);
        assert_eq!(store.read_resource("site").unwrap(), None);
    }
}
