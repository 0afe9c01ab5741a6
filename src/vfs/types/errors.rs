/*!
 * VFS Error Types
 * Structured, type-safe error handling for bundle filesystem operations
 */

use serde::{Deserialize, Deserializer, Serialize};
use std::io;
use thiserror::Error;

/// VFS operation result
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors
///
/// Load failures (`BundleNotFound`, `InvalidArchive`, `EntryUnreadable`) are fatal at
/// startup. `NotFound` and `IsADirectory` are the recoverable conditions the host
/// translates into its own response semantics; both count as not-found.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error("Not found: {0}")]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Is a directory: {0}")]
    IsADirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Resource not found: {0}")]
    BundleNotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Failed to load packed resources: {0}")]
    InvalidArchive(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Cannot read zipped content: {0}")]
    EntryUnreadable(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("I/O error: {0}")]
    IoError(#[serde(deserialize_with = "deserialize_nonempty_string")] String),
}

impl VfsError {
    /// Whether the path has no readable file behind it
    ///
    /// Reading a directory's contents is reported the same as an unknown path.
    #[inline]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound(_) | VfsError::IsADirectory(_))
    }

    /// Whether the error came from loading the bundle
    #[inline]
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        matches!(
            self,
            VfsError::BundleNotFound(_) | VfsError::InvalidArchive(_) | VfsError::EntryUnreadable(_)
        )
    }
}

impl From<VfsError> for io::Error {
    fn from(err: VfsError) -> Self {
        let kind = match &err {
            VfsError::NotFound(_) | VfsError::IsADirectory(_) | VfsError::BundleNotFound(_) => {
                io::ErrorKind::NotFound
            }
            VfsError::InvalidPattern(_) => io::ErrorKind::InvalidInput,
            VfsError::InvalidArchive(_) | VfsError::EntryUnreadable(_) => io::ErrorKind::InvalidData,
            VfsError::IoError(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

/// Deserialize and validate non-empty string for error messages
fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
