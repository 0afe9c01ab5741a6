/*!
 * Virtual File System Module
 * Archive-backed, read-only filesystem serving bundled assets from memory
 */

pub mod bundle;
pub mod traits;
pub mod types;

// Re-exports
pub use bundle::{BundleFS, BundleFile, DEFAULT_BUNDLE_FILENAME};
pub use traits::{FileSystem, OpenFile};
pub use types::{FileType, Metadata, Permissions, VfsError, VfsResult};
