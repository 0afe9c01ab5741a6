/*!
 * Bundle Loader
 * Decodes the ZIP container into file contents and directory markers
 */

use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

use super::paths;
use crate::vfs::types::{VfsError, VfsResult};

/// Fully decoded bundle, not yet visible through any filesystem
#[derive(Debug, Default)]
pub(super) struct DecodedBundle {
    pub contents: HashMap<PathBuf, Bytes>,
    pub directories: HashSet<PathBuf>,
}

impl DecodedBundle {
    fn add_file(&mut self, key: PathBuf, data: Bytes) {
        self.add_ancestors(&key);
        self.contents.insert(key, data);
    }

    fn add_dir(&mut self, key: PathBuf) {
        self.add_ancestors(&key);
        self.directories.insert(key);
    }

    fn add_ancestors(&mut self, key: &Path) {
        for dir in paths::ancestors(key) {
            // Ancestors are registered bottom-up; once one is known, the rest are too
            if !self.directories.insert(dir) {
                break;
            }
        }
    }
}

/// Read the whole bundle file into memory
pub(super) fn read_bundle(path: &Path) -> VfsResult<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => VfsError::BundleNotFound(path.display().to_string()),
        _ => VfsError::IoError(format!("{}: {}", path.display(), e)),
    })
}

/// Decode every archive entry
pub(super) fn decode(data: &[u8]) -> VfsResult<DecodedBundle> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| VfsError::InvalidArchive(e.to_string()))?;

    let mut bundle = DecodedBundle::default();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| VfsError::EntryUnreadable(format!("entry #{}: {}", index, e)))?;

        let name = entry.name().to_string();
        let key = paths::entry_key(&name);

        if entry.is_dir() {
            debug!(entry = %name, "Loaded bundle directory");
            bundle.add_dir(key);
            continue;
        }

        let mut content = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut content)
            .map_err(|e| VfsError::EntryUnreadable(format!("{}: {}", name, e)))?;

        debug!(entry = %name, size = content.len(), "Loaded bundle entry");
        bundle.add_file(key, Bytes::from(content));
    }

    Ok(bundle)
}
