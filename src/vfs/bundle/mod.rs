/*!
 * Bundle Filesystem Backend
 * Read-only filesystem over a ZIP bundle decoded into memory at startup
 */

mod file_handle;
mod loader;
mod paths;

use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::traits::{FileSystem, OpenFile};
use super::types::*;

pub use file_handle::{BundleFile, Whence};
pub use paths::ROOT;

/// Bundle file name looked up in the working directory
pub const DEFAULT_BUNDLE_FILENAME: &str = "data.bin";

/// In-memory filesystem populated once from a bundle
///
/// Every proper ancestor of a file key is present in `directories`. Nothing mutates
/// the maps after a successful load, so shared references need no locking.
#[derive(Debug, Clone, Default)]
pub struct BundleFS {
    initialized: bool,
    contents: HashMap<PathBuf, Bytes>,
    directories: HashSet<PathBuf>,
}

impl BundleFS {
    /// Create an empty, unloaded filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filesystem loaded from the bundle at `path`
    pub fn from_bundle(path: impl AsRef<Path>) -> VfsResult<Self> {
        let mut fs = Self::new();
        fs.load(path)?;
        Ok(fs)
    }

    /// Create a filesystem from an in-memory bundle
    pub fn from_bytes(data: &[u8]) -> VfsResult<Self> {
        let mut fs = Self::new();
        fs.load_bytes(data)?;
        Ok(fs)
    }

    /// Load the bundle at `path`
    ///
    /// One-time acquisition: after a successful load further calls return `Ok(())`
    /// without touching the disk. A failed load leaves the filesystem empty and
    /// unloaded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> VfsResult<()> {
        let path = path.as_ref();
        if self.initialized {
            debug!(bundle = %path.display(), "Bundle already loaded, skipping");
            return Ok(());
        }

        let data = loader::read_bundle(path)?;
        self.load_bytes(&data)?;
        info!(
            bundle = %path.display(),
            files = self.contents.len(),
            directories = self.directories.len(),
            "Bundle loaded"
        );
        Ok(())
    }

    /// Load a bundle already read into memory
    pub fn load_bytes(&mut self, data: &[u8]) -> VfsResult<()> {
        if self.initialized {
            return Ok(());
        }

        let decoded = loader::decode(data)?;
        self.contents = decoded.contents;
        self.directories = decoded.directories;
        self.initialized = true;
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of file entries
    #[inline]
    pub fn file_count(&self) -> usize {
        self.contents.len()
    }

    /// Number of known directories, root included
    #[inline]
    pub fn dir_count(&self) -> usize {
        self.directories.len()
    }

    /// Check whether `path` is a known directory
    pub fn has_dir(&self, path: &Path) -> bool {
        self.directories.contains(&paths::normalize(path))
    }

    /// Resolve `path` to a handle: file contents first, then directory markers
    pub fn resolve(&self, path: &Path) -> VfsResult<BundleFile> {
        let key = paths::normalize(path);

        if let Some(data) = self.contents.get(&key) {
            return Ok(BundleFile::file(key, data.clone()));
        }
        if self.directories.contains(&key) {
            return Ok(BundleFile::directory(key));
        }
        Err(VfsError::NotFound(path.display().to_string()))
    }
}

impl FileSystem for BundleFS {
    fn open(&self, path: &Path) -> VfsResult<Box<dyn OpenFile>> {
        Ok(Box::new(self.resolve(path)?))
    }

    fn stat(&self, path: &Path) -> VfsResult<Metadata> {
        self.resolve(path).map(|file| file.metadata())
    }

    fn read_file(&self, path: &Path) -> VfsResult<Bytes> {
        let file = self.resolve(path)?;
        match file.bytes() {
            Some(data) => Ok(data.clone()),
            None => Err(VfsError::IsADirectory(path.display().to_string())),
        }
    }

    fn glob(&self, pattern: &str) -> VfsResult<Vec<PathBuf>> {
        // Matches real files on disk; bundle contents are not searched
        let entries =
            glob::glob(pattern).map_err(|e| VfsError::InvalidPattern(format!("{}: {}", pattern, e)))?;
        Ok(entries.filter_map(Result::ok).collect())
    }

    fn exists(&self, path: &Path) -> bool {
        let key = paths::normalize(path);
        self.contents.contains_key(&key) || self.directories.contains(&key)
    }

    fn name(&self) -> &str {
        "bundle"
    }
}
