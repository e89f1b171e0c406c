//! Mock elevator for unit testing.
//!
//! Lets tests script elevation outcomes without ever touching the real
//! privilege helper (which would hang a test run on a password prompt).
//! Every call is recorded so tests can assert that elevation was attempted
//! exactly when the access check demanded it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{ElevateError, Elevator};

type Handler = dyn Fn(&Path, u32) -> Result<(), ElevateError> + Send + Sync;

/// A scriptable [`Elevator`] that records its calls.
#[derive(Clone)]
pub struct MockElevator {
    calls: Arc<Mutex<Vec<(PathBuf, u32)>>>,
    handler: Arc<Handler>,
}

impl MockElevator {
    /// An elevator whose every attempt succeeds (without changing anything
    /// on disk — pair it with `with_handler` when the test needs the file to
    /// actually become writable).
    pub fn succeeding() -> Self {
        Self::with_handler(|_, _| Ok(()))
    }

    /// An elevator whose every attempt fails.
    ///
    /// The reported error is [`ElevateError::Unsupported`]; it stands in for
    /// any helper failure, since callers only branch on success.
    pub fn failing() -> Self {
        Self::with_handler(|_, _| Err(ElevateError::Unsupported))
    }

    /// An elevator that delegates each call to `handler`.
    pub fn with_handler(
        handler: impl Fn(&Path, u32) -> Result<(), ElevateError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            handler: Arc::new(handler),
        }
    }

    /// The `(path, mode)` pairs elevation was attempted for, in order.
    pub fn calls(&self) -> Vec<(PathBuf, u32)> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// Number of elevation attempts so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock poisoned").len()
    }
}

impl Elevator for MockElevator {
    fn elevate(&self, path: &Path, mode: u32) -> Result<(), ElevateError> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push((path.to_path_buf(), mode));
        (self.handler)(path, mode)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
