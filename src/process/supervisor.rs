/*!
 * Process Supervisor
 * Launches auxiliary OS processes, tracks them, and force-terminates them
 */

use parking_lot::Mutex;
use std::io;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info, warn};

use super::output::OutputBuffer;
use super::registry::{ProcessRecord, ProcessRegistry};
use super::traits::ProcessHandle;
use super::types::*;

/// How often a waiter checks whether its child has exited
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug)]
enum ChildState {
    /// Registered, not spawned yet
    Pending,
    Running(Child),
    /// Reaped, or never spawned
    Exited(Option<ExitStatus>),
}

/// Handle to a child launched by the supervisor
///
/// Registered before the child exists. The child is only reaped while the state
/// lock is held, so a kill never reaches a pid that has already been released.
#[derive(Debug)]
pub struct ChildHandle {
    id: ProcessId,
    pid: OnceLock<u32>,
    state: Mutex<ChildState>,
}

impl ChildHandle {
    fn new(id: ProcessId) -> Self {
        Self {
            id,
            pid: OnceLock::new(),
            state: Mutex::new(ChildState::Pending),
        }
    }

    fn launched(&self, child: Child) {
        let _ = self.pid.set(child.id());
        *self.state.lock() = ChildState::Running(child);
    }

    fn spawn_failed(&self) {
        *self.state.lock() = ChildState::Exited(None);
    }

    pub fn has_exited(&self) -> bool {
        matches!(*self.state.lock(), ChildState::Exited(_))
    }

    /// Reap the child if it has exited; `None` while it is still running
    fn try_reap(&self) -> io::Result<Option<ExitStatus>> {
        let mut state = self.state.lock();
        match &mut *state {
            ChildState::Pending => Ok(None),
            ChildState::Running(child) => {
                let status = child.try_wait()?;
                if let Some(status) = status {
                    *state = ChildState::Exited(Some(status));
                }
                Ok(status)
            }
            ChildState::Exited(Some(status)) => Ok(Some(*status)),
            ChildState::Exited(None) => Err(io::Error::new(
                io::ErrorKind::Other,
                "exit status unavailable",
            )),
        }
    }
}

impl ProcessHandle for ChildHandle {
    fn os_pid(&self) -> Option<u32> {
        self.pid.get().copied()
    }

    fn kill(&self) -> ProcessResult<()> {
        let mut state = self.state.lock();
        match &mut *state {
            ChildState::Pending => Err(ProcessError::NotLaunched(self.id)),
            // Already gone: nothing left to stop
            ChildState::Exited(_) => Ok(()),
            ChildState::Running(child) => {
                // Not reaped yet, so the pid still belongs to this child
                child
                    .kill()
                    .map_err(|e| ProcessError::KillFailed(format!("pid {}: {}", child.id(), e)))?;
                let status = child.wait().ok();
                *state = ChildState::Exited(status);
                Ok(())
            }
        }
    }
}

/// Supervisor over the shared process registry
///
/// Construct once at startup and hand clones to every caller; clones share the
/// registry.
#[derive(Debug, Clone, Default)]
pub struct ProcessSupervisor {
    registry: ProcessRegistry,
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        info!("Process supervisor initialized");
        Self::default()
    }

    pub fn with_registry(registry: ProcessRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Launch `command_line` in `working_dir` with stdout/stderr captured
    ///
    /// The line is split on whitespace. The record is registered before the process
    /// is spawned, so the returned id is always resolvable by callers that query
    /// right away.
    ///
    /// - `Async`: returns at once with `Ok(())`. The record removes itself when the
    ///   child exits; launch and exit failures are only logged.
    /// - `Sync`: blocks until the child exits and returns spawn, wait, or non-zero
    ///   exit failures. The record stays tracked until terminated.
    ///
    /// An empty command line is rejected before anything is registered.
    pub fn start(
        &self,
        command_line: &str,
        working_dir: impl AsRef<Path>,
        mode: LaunchMode,
    ) -> (ProcessId, ProcessResult<()>) {
        match CommandLine::parse(command_line) {
            Ok(command) => self.launch(command_line.to_string(), command, working_dir.as_ref(), mode),
            Err(e) => {
                let id = ProcessId::new();
                warn!(id = %id, error = %e, "Rejected command line");
                (id, Err(e))
            }
        }
    }

    /// Launch an already split command; the program path is used as given
    pub fn start_command(
        &self,
        command: CommandLine,
        working_dir: impl AsRef<Path>,
        mode: LaunchMode,
    ) -> (ProcessId, ProcessResult<()>) {
        self.launch(command.to_string(), command, working_dir.as_ref(), mode)
    }

    fn launch(
        &self,
        command_line: String,
        command: CommandLine,
        working_dir: &Path,
        mode: LaunchMode,
    ) -> (ProcessId, ProcessResult<()>) {
        let id = ProcessId::new();
        let handle = Arc::new(ChildHandle::new(id));
        let record = ProcessRecord::new(id, command_line.as_str(), working_dir, handle.clone());
        let stdout = record.stdout.clone();
        let stderr = record.stderr.clone();
        self.registry.insert(record);

        let mut child = match spawn(&command, working_dir) {
            Ok(child) => child,
            Err(e) => {
                error!(
                    id = %id,
                    command = %command_line,
                    dir = %working_dir.display(),
                    error = %e,
                    "Command failed to start"
                );
                // Nothing to kill, so a later terminate just drops the record
                handle.spawn_failed();
                return match mode {
                    LaunchMode::Async => {
                        self.registry.remove(&id);
                        (id, Ok(()))
                    }
                    LaunchMode::Sync => (id, Err(e)),
                };
            }
        };

        info!(
            id = %id,
            os_pid = child.id(),
            command = %command_line,
            dir = %working_dir.display(),
            ?mode,
            "Process started"
        );

        let readers = capture(&mut child, &stdout, &stderr);
        handle.launched(child);
        let run = Running {
            id,
            command_line,
            handle,
            readers,
        };

        match mode {
            LaunchMode::Sync => (id, run.wait()),
            LaunchMode::Async => {
                let registry = self.registry.clone();
                let monitor = thread::Builder::new()
                    .name(format!("proc-{}", id))
                    .spawn(move || {
                        let _ = run.wait();
                        registry.remove(&id);
                    });
                if let Err(e) = monitor {
                    // The record stays tracked so it can still be terminated
                    error!(id = %id, error = %e, "Could not start process monitor");
                }
                (id, Ok(()))
            }
        }
    }

    /// Force-kill one process; `false` if unknown or the kill failed
    pub fn terminate(&self, id: &ProcessId) -> bool {
        match self.registry.terminate(id) {
            Ok(()) => {
                info!(id = %id, "Process terminated");
                true
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Process termination failed");
                false
            }
        }
    }

    /// Force-kill every tracked process
    pub fn terminate_all(&self) -> TerminationReport {
        let report = self.registry.terminate_all();
        if report.is_success() {
            info!(terminated = report.terminated.len(), "All processes terminated");
        } else {
            warn!(
                terminated = report.terminated.len(),
                failed = report.failed.len(),
                "Some processes could not be terminated"
            );
        }
        report
    }

    /// Captured stdout of a still-tracked process
    pub fn output(&self, id: &ProcessId) -> Option<Vec<u8>> {
        self.registry.stdout(id)
    }

    /// Captured stderr of a still-tracked process
    pub fn stderr_output(&self, id: &ProcessId) -> Option<Vec<u8>> {
        self.registry.stderr(id)
    }

    pub fn is_tracked(&self, id: &ProcessId) -> bool {
        self.registry.contains(id)
    }

    /// Number of tracked processes
    pub fn count(&self) -> usize {
        self.registry.len()
    }

    pub fn tracked_ids(&self) -> Vec<ProcessId> {
        self.registry.ids()
    }
}

fn spawn(command: &CommandLine, working_dir: &Path) -> ProcessResult<Child> {
    Command::new(&command.program)
        .args(&command.args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ProcessError::SpawnFailed(format!("{}: {}", command.program, e)))
}

fn capture(child: &mut Child, stdout: &OutputBuffer, stderr: &OutputBuffer) -> Vec<JoinHandle<()>> {
    let mut readers = Vec::new();
    if let Some(pipe) = child.stdout.take() {
        readers.extend(stdout.capture(pipe, "stdout"));
    }
    if let Some(pipe) = child.stderr.take() {
        readers.extend(stderr.capture(pipe, "stderr"));
    }
    readers
}

/// A spawned child plus its capture threads
struct Running {
    id: ProcessId,
    command_line: String,
    handle: Arc<ChildHandle>,
    readers: Vec<JoinHandle<()>>,
}

impl Running {
    /// Wait for exit and for the captured streams to drain
    fn wait(mut self) -> ProcessResult<()> {
        let status = loop {
            match self.handle.try_reap() {
                Ok(Some(status)) => break Ok(status),
                Ok(None) => thread::sleep(EXIT_POLL_INTERVAL),
                Err(e) => break Err(e),
            }
        };
        for reader in self.readers.drain(..) {
            let _ = reader.join();
        }

        match status {
            Ok(status) if status.success() => {
                info!(id = %self.id, command = %self.command_line, "Process exited");
                Ok(())
            }
            Ok(status) => {
                warn!(
                    id = %self.id,
                    command = %self.command_line,
                    code = ?status.code(),
                    "Process exited with failure"
                );
                Err(ProcessError::ExitFailure {
                    code: status.code(),
                })
            }
            Err(e) => {
                error!(id = %self.id, command = %self.command_line, error = %e, "Wait failed");
                Err(ProcessError::WaitFailed(e.to_string()))
            }
        }
    }
}
