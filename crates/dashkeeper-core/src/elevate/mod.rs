//! Privilege elevation behind an interface.
//!
//! Configuration files occasionally end up owned by another principal —
//! typically root, after an install script or a container volume mount.
//! The manager then asks an [`Elevator`] to hand the file back: reassign
//! ownership to the current user and restore the expected permission mode.
//!
//! The elevator is a trait so the manager never spawns processes directly:
//!
//! - [`SudoElevator`] (Unix) runs the system privilege helper, always as an
//!   argument vector and never through a shell.
//! - [`MockElevator`] records calls and returns scripted outcomes for tests.
//! - [`UnsupportedElevator`] always fails; it is the native choice on
//!   platforms without a helper and doubles as the "always deny" test stub.

use std::path::Path;

use thiserror::Error;

pub mod mock;

#[cfg(unix)]
pub mod sudo;

#[cfg(unix)]
pub use sudo::SudoElevator;

pub use mock::MockElevator;

/// Errors from a privilege elevation attempt.
#[derive(Debug, Error)]
pub enum ElevateError {
    /// This platform has no privilege helper to call.
    #[error("privilege elevation is not supported on this platform")]
    Unsupported,

    /// Neither `USER` nor `USERNAME` identifies the current user, so there
    /// is no principal to hand the file to.
    #[error("could not determine the current user from the environment")]
    UnknownUser,

    /// The helper binary could not be started at all.
    #[error("could not spawn {helper}: {source}")]
    Spawn {
        helper: String,
        #[source]
        source: std::io::Error,
    },

    /// The helper ran but reported failure.
    #[error("{helper} {action} failed ({status}): {stderr}")]
    HelperFailed {
        helper: String,
        action: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// One capability: make `path` accessible to the current user again.
///
/// Implementations reassign ownership and restore `mode` (the descriptor's
/// permission mode, e.g. `0o644`). An elevation either fully succeeds or
/// reports why it could not.
pub trait Elevator: Send + Sync {
    /// Attempts the elevation.
    ///
    /// # Errors
    ///
    /// Returns an [`ElevateError`] when the helper cannot run or exits
    /// unsuccessfully; the file's state is then unspecified but no worse
    /// than before.
    fn elevate(&self, path: &Path, mode: u32) -> Result<(), ElevateError>;
}

/// Elevator for platforms without a privilege helper. Every call fails with
/// [`ElevateError::Unsupported`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedElevator;

impl Elevator for UnsupportedElevator {
    fn elevate(&self, _path: &Path, _mode: u32) -> Result<(), ElevateError> {
        Err(ElevateError::Unsupported)
    }
}

/// Returns the native elevator for this platform.
#[cfg(unix)]
pub fn platform_elevator() -> Box<dyn Elevator> {
    Box::new(SudoElevator::new())
}

/// Returns the native elevator for this platform.
#[cfg(not(unix))]
pub fn platform_elevator() -> Box<dyn Elevator> {
    Box::new(UnsupportedElevator)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
