/*!
 * VFS Types
 * Shared types for the read-only bundle filesystem
 */

mod errors;
mod file_type;
mod metadata;
mod permissions;

pub use errors::{VfsError, VfsResult};
pub use file_type::FileType;
pub use metadata::{Metadata, BUNDLE_MTIME_MILLIS};
pub use permissions::Permissions;
