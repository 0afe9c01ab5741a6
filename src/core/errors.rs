/*!
 * Error Types
 * Top-level runtime errors with miette diagnostics
 */

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::process::ProcessError;
use crate::vfs::VfsError;

/// Result type for host bootstrap
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors surfaced by the host process
#[derive(Error, Debug, Diagnostic)]
pub enum RuntimeError {
    #[error("Bundle filesystem error: {0}")]
    #[diagnostic(
        code(binfs::bundle),
        help("The bundle must be a ZIP archive in the working directory (see BINFS_BUNDLE).")
    )]
    Bundle(#[from] VfsError),

    #[error("Process supervisor error: {0}")]
    #[diagnostic(
        code(binfs::process),
        help("Check the command line and working directory. View logs for captured stderr.")
    )]
    Process(#[from] ProcessError),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(binfs::config),
        help("Fix the BINFS_* environment variables or unset them to use defaults.")
    )]
    Config(#[from] ConfigError),
}
