/*!
 * Signals Module
 * Termination signal handling for the host process
 */

pub mod shutdown;

// Re-export public API
pub use shutdown::{companion_path, is_regular_file, ShutdownHook, SHUTDOWN_EXIT_CODE};
