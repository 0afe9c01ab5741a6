/*!
 * Process Types
 * Common types for the process supervisor
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Command exited with status {code:?}")]
    ExitFailure { code: Option<i32> },

    #[error("Wait failed: {0}")]
    WaitFailed(String),

    #[error("Process not found: {0}")]
    NotFound(ProcessId),

    #[error("Process {0} has not been launched yet")]
    NotLaunched(ProcessId),

    #[error("Kill failed: {0}")]
    KillFailed(String),
}

/// Identifier of a supervised process (random, version-4 layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(Uuid);

impl ProcessId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProcessId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How `start` waits for the child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// Return immediately; the record removes itself when the child exits
    Async,
    /// Block until the child exits; the record stays tracked afterwards
    Sync,
}

/// A command line split into program and arguments
///
/// Splitting is on raw whitespace. Quotes and escapes are not interpreted, so an
/// argument containing spaces cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn parse(line: &str) -> ProcessResult<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| ProcessError::InvalidCommand("empty command line".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// A bare program with no arguments; the path is taken verbatim, spaces included
    pub fn program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Outcome of terminating every tracked process
///
/// Ids in `failed` are still tracked; nothing already removed is restored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationReport {
    pub terminated: Vec<ProcessId>,
    pub failed: Vec<ProcessId>,
}

impl TerminationReport {
    /// True when no kill failed
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
