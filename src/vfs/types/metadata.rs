/*!
 * VFS Metadata
 * Stat view over a bundle entry
 */

use super::file_type::FileType;
use super::permissions::Permissions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Modification time reported for every bundle entry, in milliseconds since the epoch.
///
/// Archive timestamps are not trusted, so all entries share this constant.
pub const BUNDLE_MTIME_MILLIS: u64 = 1_672_502_400_000;

/// File metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Metadata {
    pub path: PathBuf,
    pub file_type: FileType,
    pub size: u64,
    pub permissions: Permissions,
    pub modified: SystemTime,
}

impl Metadata {
    /// Metadata for a file whose contents are `size` bytes long
    pub fn file(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            file_type: FileType::File,
            size,
            permissions: Permissions::bundled_file(),
            modified: bundle_mtime(),
        }
    }

    /// Metadata for a directory marker
    pub fn directory(path: PathBuf) -> Self {
        Self {
            path,
            file_type: FileType::Directory,
            size: 0,
            permissions: Permissions::bundled_dir(),
            modified: bundle_mtime(),
        }
    }

    /// Check if this is a directory
    #[inline(always)]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.file_type, FileType::Directory)
    }

    /// Check if this is a regular file
    #[inline(always)]
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.file_type, FileType::File)
    }

    /// Final path component, or the whole path for the root marker
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// The fixed modification time shared by all bundle entries
pub fn bundle_mtime() -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(BUNDLE_MTIME_MILLIS)
}
