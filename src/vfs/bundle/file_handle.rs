/*!
 * File Handle Implementation
 * Per-open cursor over a bundle entry
 */

use bytes::Bytes;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::super::traits::OpenFile;
use super::super::types::*;

/// Origin of a clamped seek
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

/// Bundle file handle
///
/// A handle without backing content is a directory marker. A zero-length file and a
/// directory both report size 0; only the presence of content tells them apart.
#[derive(Debug, Clone)]
pub struct BundleFile {
    path: PathBuf,
    data: Option<Bytes>,
    offset: u64,
    size: u64,
}

impl BundleFile {
    pub(super) fn file(path: PathBuf, data: Bytes) -> Self {
        let size = data.len() as u64;
        Self {
            path,
            data: Some(data),
            offset: 0,
            size,
        }
    }

    pub(super) fn directory(path: PathBuf) -> Self {
        Self {
            path,
            data: None,
            offset: 0,
            size: 0,
        }
    }

    /// Current read position
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Length of the backing content (0 for directories)
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether every byte has been read
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset == self.size
    }

    /// Backing content, `None` for directory markers
    pub fn bytes(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Move the offset relative to `whence`, saturating to `[0, size]`
    pub fn seek_clamped(&mut self, offset: i64, whence: Whence) -> u64 {
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.offset as i128,
            Whence::End => self.size as i128,
        };
        let target = (base + offset as i128).clamp(0, self.size as i128);
        self.offset = target as u64;
        self.offset
    }
}

impl Read for BundleFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(data) = &self.data else {
            return Ok(0);
        };

        let start = self.offset as usize;
        let remaining = data.get(start..).unwrap_or_default();
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.offset += n as u64;
        Ok(n)
    }
}

impl Seek for BundleFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let position = match pos {
            SeekFrom::Start(n) => self.seek_clamped(i64::try_from(n).unwrap_or(i64::MAX), Whence::Start),
            SeekFrom::Current(delta) => self.seek_clamped(delta, Whence::Current),
            SeekFrom::End(delta) => self.seek_clamped(delta, Whence::End),
        };
        Ok(position)
    }
}

impl OpenFile for BundleFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn is_dir(&self) -> bool {
        self.data.is_none()
    }

    fn metadata(&self) -> Metadata {
        match self.data {
            Some(_) => Metadata::file(self.path.clone(), self.size),
            None => Metadata::directory(self.path.clone()),
        }
    }

    fn close(self: Box<Self>) -> VfsResult<()> {
        Ok(())
    }
}
