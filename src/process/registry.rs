/*!
 * Process Registry
 * Single-lock map from process id to live process record
 */

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::output::OutputBuffer;
use super::traits::ProcessHandle;
use super::types::{ProcessError, ProcessId, ProcessResult, TerminationReport};

/// A tracked process
#[derive(Debug)]
pub struct ProcessRecord {
    pub id: ProcessId,
    pub command_line: String,
    pub working_dir: PathBuf,
    pub handle: Arc<dyn ProcessHandle>,
    pub stdout: OutputBuffer,
    pub stderr: OutputBuffer,
}

impl ProcessRecord {
    pub fn new(
        id: ProcessId,
        command_line: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        handle: Arc<dyn ProcessHandle>,
    ) -> Self {
        Self {
            id,
            command_line: command_line.into(),
            working_dir: working_dir.into(),
            handle,
            stdout: OutputBuffer::new(),
            stderr: OutputBuffer::new(),
        }
    }
}

/// Shared process registry
///
/// Every operation holds the one lock for its whole duration; there is no
/// per-record locking. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    records: Arc<Mutex<HashMap<ProcessId, ProcessRecord>>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a record, replacing any record with the same id
    pub fn insert(&self, record: ProcessRecord) {
        self.records.lock().insert(record.id, record);
    }

    /// Stop tracking `id`
    pub fn remove(&self, id: &ProcessId) -> Option<ProcessRecord> {
        self.records.lock().remove(id)
    }

    pub fn contains(&self, id: &ProcessId) -> bool {
        self.records.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Ids of every tracked process
    pub fn ids(&self) -> Vec<ProcessId> {
        self.records.lock().keys().copied().collect()
    }

    /// Snapshot of captured stdout
    pub fn stdout(&self, id: &ProcessId) -> Option<Vec<u8>> {
        self.records.lock().get(id).map(|r| r.stdout.snapshot())
    }

    /// Snapshot of captured stderr
    pub fn stderr(&self, id: &ProcessId) -> Option<Vec<u8>> {
        self.records.lock().get(id).map(|r| r.stderr.snapshot())
    }

    /// Kill one process; the record is removed only if the kill succeeded
    pub fn terminate(&self, id: &ProcessId) -> ProcessResult<()> {
        let mut records = self.records.lock();
        let record = records.get(id).ok_or(ProcessError::NotFound(*id))?;

        record.handle.kill()?;
        records.remove(id);
        Ok(())
    }

    /// Kill every process in one locked sweep
    ///
    /// Killed records are removed as the sweep goes; failures stay tracked and are
    /// listed in the report. Removals are never rolled back.
    pub fn terminate_all(&self) -> TerminationReport {
        let mut records = self.records.lock();
        let mut report = TerminationReport::default();

        records.retain(|id, record| match record.handle.kill() {
            Ok(()) => {
                info!(id = %id, command = %record.command_line, "Process killed");
                report.terminated.push(*id);
                false
            }
            Err(e) => {
                warn!(id = %id, command = %record.command_line, error = %e, "Process kill failed");
                report.failed.push(*id);
                true
            }
        });

        report
    }
}
