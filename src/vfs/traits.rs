/*!
 * VFS Traits
 * Capability set the host file-serving layer consumes
 */

use bytes::Bytes;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use super::types::*;

/// Read-only virtual filesystem
///
/// Directory enumeration is deliberately absent: callers cannot list a directory
/// through this trait, so nothing can come to depend on it.
pub trait FileSystem: Send + Sync {
    /// Open a file or directory marker
    fn open(&self, path: &Path) -> VfsResult<Box<dyn OpenFile>>;

    /// Get file metadata
    fn stat(&self, path: &Path) -> VfsResult<Metadata>;

    /// Read entire file contents
    fn read_file(&self, path: &Path) -> VfsResult<Bytes>;

    /// Expand a glob pattern against the host filesystem
    fn glob(&self, pattern: &str) -> VfsResult<Vec<PathBuf>>;

    /// Check if a file or directory exists
    fn exists(&self, path: &Path) -> bool;

    /// Get filesystem name/type
    fn name(&self) -> &str;
}

/// Open file handle
///
/// Reads advance the handle's offset; seeks saturate to `[0, size]`.
pub trait OpenFile: Read + Seek + Send + Sync {
    /// Path the handle was opened with
    fn path(&self) -> &Path;

    /// Whether the handle refers to a directory marker
    fn is_dir(&self) -> bool;

    /// Get file metadata
    fn metadata(&self) -> Metadata;

    /// Release the handle
    fn close(self: Box<Self>) -> VfsResult<()>;
}
