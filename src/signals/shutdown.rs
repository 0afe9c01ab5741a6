/*!
 * Shutdown Hook
 * Starts the companion process and force-stops every tracked process on SIGINT/SIGTERM
 */

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::RuntimeConfig;
use crate::process::{CommandLine, LaunchMode, ProcessId, ProcessSupervisor, TerminationReport};

/// Exit status used after a signal-driven shutdown
pub const SHUTDOWN_EXIT_CODE: i32 = 1;

/// Process-wide shutdown hook
///
/// The shutdown sequence runs at most once per process; it cannot be cancelled or
/// re-armed.
#[derive(Debug, Clone)]
pub struct ShutdownHook {
    supervisor: ProcessSupervisor,
    grace: Duration,
    fired: Arc<AtomicBool>,
}

impl ShutdownHook {
    pub fn new(supervisor: ProcessSupervisor, grace: Duration) -> Self {
        Self {
            supervisor,
            grace,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the companion (if present) and install the signal listener
    ///
    /// Must be called from within a Tokio runtime.
    pub fn install(supervisor: ProcessSupervisor, config: &RuntimeConfig) -> Self {
        let hook = Self::new(supervisor, config.shutdown_grace());

        if config.companion_enabled {
            match std::env::current_exe() {
                Ok(exe) => {
                    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
                    hook.start_companion(&companion_path(dir, &config.companion_name));
                }
                Err(e) => warn!(error = %e, "Cannot locate running binary, companion skipped"),
            }
        }

        hook.listen();
        hook
    }

    /// Launch the companion asynchronously if it is a regular file
    ///
    /// The id is only reachable through `terminate_all` afterwards.
    pub fn start_companion(&self, path: &Path) -> Option<ProcessId> {
        if !is_regular_file(path) {
            debug!(companion = %path.display(), "No companion executable found");
            return None;
        }

        // The path is absolute and may contain spaces, so it is never split
        let command = CommandLine::program(path.to_string_lossy());
        let (id, _) = self.supervisor.start_command(command, ".", LaunchMode::Async);
        info!(id = %id, companion = %path.display(), "Companion process started");
        Some(id)
    }

    /// Spawn the task that waits for a termination signal and shuts down
    pub fn listen(&self) -> JoinHandle<()> {
        let hook = self.clone();
        tokio::spawn(async move {
            match wait_for_signal().await {
                Ok(signal) => info!(signal, "Termination signal received"),
                Err(e) => {
                    error!(error = %e, "Could not install signal listener");
                    return;
                }
            }

            if hook.shutdown().await.is_some() {
                std::process::exit(SHUTDOWN_EXIT_CODE);
            }
        })
    }

    /// Wait the grace period, then force-stop every tracked process
    ///
    /// Returns `None` if the shutdown already ran.
    pub async fn shutdown(&self) -> Option<TerminationReport> {
        if self.fired.swap(true, Ordering::SeqCst) {
            return None;
        }

        // Let in-flight output flush before killing
        tokio::time::sleep(self.grace).await;

        let report = self.supervisor.terminate_all();
        info!(
            terminated = report.terminated.len(),
            failed = report.failed.len(),
            "Shutdown complete"
        );
        Some(report)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

/// Companion executable path next to the running binary
///
/// The platform executable suffix (`.exe` on Windows) is appended.
pub fn companion_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
}

/// Whether `path` exists and is a regular file
pub fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}

#[cfg(unix)]
async fn wait_for_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = interrupt.recv() => Ok("SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
