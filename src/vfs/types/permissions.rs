/*!
 * VFS Permissions
 * Unix-style mode bits reported for bundle entries
 */

use serde::{Deserialize, Serialize};

/// File permissions (Unix-style)
///
/// The bundle is read-only, so the write bits are never set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
    pub mode: u32,
}

impl Permissions {
    /// Mode reported for bundled file contents (0o444)
    #[inline]
    #[must_use]
    pub const fn bundled_file() -> Self {
        Self { mode: 0o444 }
    }

    /// Mode reported for directory markers (0o555)
    #[inline]
    #[must_use]
    pub const fn bundled_dir() -> Self {
        Self { mode: 0o555 }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_readonly(&self) -> bool {
        self.mode & 0o222 == 0
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::bundled_file()
    }
}
