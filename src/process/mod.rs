/*!
 * Process Module
 * Supervision of auxiliary OS processes
 */

pub mod output;
pub mod registry;
pub mod supervisor;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use output::OutputBuffer;
pub use registry::{ProcessRecord, ProcessRegistry};
pub use supervisor::{ChildHandle, ProcessSupervisor};
pub use traits::ProcessHandle;
pub use types::{
    CommandLine, LaunchMode, ProcessError, ProcessId, ProcessResult, TerminationReport,
};
