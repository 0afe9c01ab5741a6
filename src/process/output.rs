/*!
 * Output Capture
 * Shared in-memory sinks for child stdout/stderr
 */

use parking_lot::Mutex;
use std::io::Read;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::warn;

/// Growable byte buffer shared between a reader thread and the registry
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything captured so far
    pub fn snapshot(&self) -> Vec<u8> {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn append(&self, chunk: &[u8]) {
        self.inner.lock().extend_from_slice(chunk);
    }

    /// Drain `source` into this buffer on a dedicated thread
    pub fn capture<R>(&self, mut source: R, stream: &'static str) -> Option<JoinHandle<()>>
    where
        R: Read + Send + 'static,
    {
        let sink = self.clone();
        thread::Builder::new()
            .name(format!("capture-{}", stream))
            .spawn(move || {
                let mut chunk = [0u8; 8192];
                loop {
                    match source.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => sink.append(&chunk[..n]),
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            warn!(stream, error = %e, "Output capture stopped");
                            break;
                        }
                    }
                }
            })
            .map_err(|e| warn!(stream, error = %e, "Could not start output capture thread"))
            .ok()
    }
}
