/*!
 * Process Traits
 * Seams between the registry and the OS
 */

use super::types::ProcessResult;
use std::fmt::Debug;

/// A killable process tracked by the registry
pub trait ProcessHandle: Send + Sync + Debug {
    /// OS-level process id, once launched
    fn os_pid(&self) -> Option<u32>;

    /// Forcefully stop the process
    ///
    /// There is no graceful variant. A process that has already exited counts as
    /// stopped.
    fn kill(&self) -> ProcessResult<()>;
}
