/*!
 * Process Supervisor Tests
 * Launch modes, termination, and output capture against real OS processes
 */

#![cfg(unix)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use binfs::process::{
    LaunchMode, ProcessError, ProcessHandle, ProcessId, ProcessRecord, ProcessResult,
    ProcessSupervisor,
};
use tempfile::TempDir;

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    condition()
}

#[derive(Debug)]
struct UnkillableHandle;

impl ProcessHandle for UnkillableHandle {
    fn os_pid(&self) -> Option<u32> {
        None
    }

    fn kill(&self) -> ProcessResult<()> {
        Err(ProcessError::KillFailed("operation not permitted".to_string()))
    }
}

#[test]
fn test_async_start_returns_promptly() {
    let supervisor = ProcessSupervisor::new();

    let started = Instant::now();
    let (id, result) = supervisor.start("sleep 5", ".", LaunchMode::Async);

    assert!(result.is_ok());
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(supervisor.is_tracked(&id));

    assert!(supervisor.terminate(&id));
}

#[test]
fn test_async_record_removed_after_exit() {
    let supervisor = ProcessSupervisor::new();
    let (id, _) = supervisor.start("echo done", ".", LaunchMode::Async);

    assert!(wait_until(Duration::from_secs(5), || !supervisor.is_tracked(&id)));
    assert!(supervisor.output(&id).is_none());
}

#[test]
fn test_sync_start_blocks_until_exit() {
    let supervisor = ProcessSupervisor::new();

    let started = Instant::now();
    let (id, result) = supervisor.start("sleep 0.2", ".", LaunchMode::Sync);

    assert!(result.is_ok());
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(supervisor.output(&id), Some(Vec::new()));
}

#[test]
fn test_sync_output_in_working_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("marker.txt"), b"").unwrap();

    let supervisor = ProcessSupervisor::new();
    let (id, result) = supervisor.start("ls", dir.path(), LaunchMode::Sync);

    assert!(result.is_ok());
    let output = String::from_utf8(supervisor.output(&id).unwrap()).unwrap();
    assert_eq!(output.trim(), "marker.txt");
}

#[test]
fn test_sync_failure_captures_stderr() {
    let supervisor = ProcessSupervisor::new();
    let (id, result) = supervisor.start("ls /definitely/not/a/real/path", ".", LaunchMode::Sync);

    assert!(matches!(result, Err(ProcessError::ExitFailure { .. })));
    assert!(!supervisor.stderr_output(&id).unwrap().is_empty());
    assert!(supervisor.output(&id).unwrap().is_empty());
}

#[test]
fn test_terminate_unknown_id() {
    let supervisor = ProcessSupervisor::new();
    assert!(!supervisor.terminate(&ProcessId::new()));
}

#[test]
fn test_terminate_after_sync_spawn_failure() {
    let supervisor = ProcessSupervisor::new();
    let (id, result) = supervisor.start("no-such-binary-on-path", ".", LaunchMode::Sync);

    assert!(matches!(result, Err(ProcessError::SpawnFailed(_))));
    assert!(supervisor.is_tracked(&id));
    assert!(supervisor.terminate(&id));
    assert!(supervisor.terminate_all().is_success());
    assert_eq!(supervisor.count(), 0);
}

#[test]
fn test_terminate_all_while_processes_exit() {
    let supervisor = ProcessSupervisor::new();
    for _ in 0..16 {
        let _ = supervisor.start("true", ".", LaunchMode::Async);
    }
    thread::sleep(Duration::from_millis(30));

    // Children exiting on their own still count as stopped
    let report = supervisor.terminate_all();
    assert!(report.is_success(), "{:?}", report);
    assert!(wait_until(Duration::from_secs(5), || supervisor.count() == 0));
}

#[test]
fn test_terminate_all_healthy() {
    let supervisor = ProcessSupervisor::new();
    let ids: Vec<ProcessId> = (0..3)
        .map(|_| supervisor.start("sleep 30", ".", LaunchMode::Async).0)
        .collect();
    assert_eq!(supervisor.count(), 3);

    let report = supervisor.terminate_all();

    assert!(report.is_success());
    assert_eq!(report.terminated.len(), 3);
    for id in &ids {
        assert!(report.terminated.contains(id));
        assert!(!supervisor.is_tracked(id));
    }
    assert_eq!(supervisor.count(), 0);
}

#[test]
fn test_terminate_all_keeps_unkillable() {
    let supervisor = ProcessSupervisor::new();
    let (a, _) = supervisor.start("sleep 30", ".", LaunchMode::Async);
    let (b, _) = supervisor.start("sleep 30", ".", LaunchMode::Async);

    let stuck = ProcessId::new();
    supervisor
        .registry()
        .insert(ProcessRecord::new(stuck, "stuck", ".", Arc::new(UnkillableHandle)));

    let report = supervisor.terminate_all();

    assert!(!report.is_success());
    assert_eq!(report.failed, vec![stuck]);
    assert!(report.terminated.contains(&a));
    assert!(report.terminated.contains(&b));
    assert_eq!(supervisor.tracked_ids(), vec![stuck]);

    // A single terminate on the stuck record fails the same way
    assert!(!supervisor.terminate(&stuck));
    assert!(supervisor.is_tracked(&stuck));
}

#[test]
fn test_concurrent_starts() {
    let supervisor = ProcessSupervisor::new();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let supervisor = supervisor.clone();
            thread::spawn(move || {
                let (id, result) = supervisor.start(&format!("echo {}", i), ".", LaunchMode::Sync);
                result.unwrap();
                (i, id)
            })
        })
        .collect();

    for handle in handles {
        let (i, id) = handle.join().unwrap();
        let output = supervisor.output(&id).unwrap();
        assert_eq!(output, format!("{}\n", i).into_bytes());
    }
    assert_eq!(supervisor.count(), 8);
}
