//! # File Registry
//!
//! The host test runner's view of its files: two parallel ordered lists,
//! `served` and `included`. `included` is always a subset of `served`, and an
//! entry present in both lists is the *same* record (shared via [`Arc`]), so
//! record identity can be compared with [`Arc::ptr_eq`].
//!
//! The registry is supplied by the host per run and mutated in place by the
//! synchronizer between stages; the engine never builds one from scratch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// One file known to the host test runner.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Current (possibly transformed) absolute path.
    pub path: PathBuf,
    /// Path the record originally entered the registry under.
    pub original_path: PathBuf,
    /// On-disk staging location, if the host materialized one.
    pub content_path: Option<PathBuf>,
    pub mtime: SystemTime,
    pub is_url: bool,
    /// Raw content, if loaded.
    pub content: Option<String>,
    /// Hex fingerprint of `content`.
    pub content_hash: String,
}

impl FileRecord {
    /// Build a record with loaded content and a freshly computed fingerprint.
    pub fn with_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        let content_hash = fingerprint(content.as_bytes());
        Self {
            original_path: path.clone(),
            path,
            content_path: None,
            mtime: SystemTime::now(),
            is_url: false,
            content: Some(content),
            content_hash,
        }
    }
}

/// Hex content fingerprint used for record provenance.
pub fn fingerprint(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// The host's two parallel ordered file lists.
#[derive(Debug, Default, Clone)]
pub struct FileRegistry {
    pub served: Vec<Arc<FileRecord>>,
    pub included: Vec<Arc<FileRecord>>,
}

impl FileRegistry {
    pub fn new(served: Vec<Arc<FileRecord>>, included: Vec<Arc<FileRecord>>) -> Self {
        Self { served, included }
    }

    /// Build a registry where every record is both served and included,
    /// sharing one allocation per record across the two lists.
    pub fn shared(records: Vec<FileRecord>) -> Self {
        let served: Vec<Arc<FileRecord>> = records.into_iter().map(Arc::new).collect();
        let included = served.clone();
        Self { served, included }
    }

    /// Position of `path` in the served list.
    pub fn find_served(&self, path: &Path) -> Option<usize> {
        self.served.iter().position(|r| r.path == path)
    }

    /// Position of `path` in the included list.
    pub fn find_included(&self, path: &Path) -> Option<usize> {
        self.included.iter().position(|r| r.path == path)
    }
}

#[cfg(test)]
mod tests;
