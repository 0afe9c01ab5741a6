/*!
 * binfs Library
 * Archive-backed virtual filesystem and auxiliary process supervision
 */

pub mod config;
pub mod core;
pub mod monitoring;
pub mod process;
pub mod signals;
pub mod vfs;

// Re-exports
pub use config::{ConfigError, RuntimeConfig};
pub use crate::core::errors::{RuntimeError, RuntimeResult};
pub use monitoring::init_tracing;
pub use process::{LaunchMode, ProcessError, ProcessId, ProcessSupervisor, TerminationReport};
pub use signals::ShutdownHook;
pub use vfs::{BundleFS, FileSystem, OpenFile, VfsError};
