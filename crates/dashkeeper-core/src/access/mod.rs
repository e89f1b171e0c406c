//! File access validation.
//!
//! Two kinds of check, with different contracts:
//!
//! - [`check_access`] answers "could we read and write this path right now"
//!   WITHOUT touching the filesystem state. It is safe to call from status
//!   reporting loops.
//! - [`validate_path`] is the gate for path REASSIGNMENT. It proves the
//!   parent directory accepts new files by creating and removing a zero-byte
//!   probe file, so a manifest entry can never point somewhere unusable.
//!
//! On Unix the non-mutating checks go through `access(2)`, which evaluates
//! the real uid/gid the way the desktop application is launched with. Other
//! platforms fall back to metadata-based approximations.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Outcome of a non-mutating access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessResult {
    /// The path is readable and writable (or creatable, when absent).
    Ok,
    /// The file exists but cannot be read.
    DeniedRead { reason: String },
    /// The file exists and is readable but cannot be written.
    DeniedWrite { reason: String },
    /// The file is absent and its parent directory is missing or rejects
    /// new entries.
    MissingParent { reason: String },
}

impl AccessResult {
    /// `true` when the check found no obstacle.
    pub fn is_ok(&self) -> bool {
        matches!(self, AccessResult::Ok)
    }

    /// The denial reason, when there is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            AccessResult::Ok => None,
            AccessResult::DeniedRead { reason }
            | AccessResult::DeniedWrite { reason }
            | AccessResult::MissingParent { reason } => Some(reason),
        }
    }
}

/// Why a candidate path was rejected by [`validate_path`].
#[derive(Debug, Error)]
pub enum PathValidationError {
    /// An empty string can never name a configuration file.
    #[error("path is empty")]
    Empty,

    /// The directory that would hold the file does not exist.
    #[error("parent directory does not exist: {0}")]
    ParentMissing(PathBuf),

    /// The parent directory exists but refused the probe file.
    #[error("parent directory {dir} is not writable: {source}")]
    NotWritable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Checks read/write access to `path` without mutating anything.
///
/// For an existing path: read permission is checked before write permission,
/// so a file that is both unreadable and unwritable reports the read denial.
/// For an absent path the parent directory decides whether the file could be
/// created.
pub fn check_access(path: &Path) -> AccessResult {
    if path.exists() {
        if !readable(path) {
            return AccessResult::DeniedRead {
                reason: "no read permission".to_string(),
            };
        }
        if !writable(path) {
            return AccessResult::DeniedWrite {
                reason: "no write permission".to_string(),
            };
        }
        return AccessResult::Ok;
    }

    let parent = parent_dir(path);
    if !parent.is_dir() {
        return AccessResult::MissingParent {
            reason: format!("parent directory does not exist: {}", parent.display()),
        };
    }
    if !writable(&parent) {
        return AccessResult::MissingParent {
            reason: "no write permission to parent directory".to_string(),
        };
    }
    AccessResult::Ok
}

/// Validates `path` as a candidate location for a configuration file.
///
/// The parent directory must exist and accept a freshly created probe file.
/// The probe uses a random name and is removed immediately; a leftover probe
/// (removal raced with something else) is logged and ignored.
///
/// # Errors
///
/// Returns a [`PathValidationError`] naming the first failed requirement.
pub fn validate_path(path: &Path) -> Result<(), PathValidationError> {
    if path.as_os_str().is_empty() {
        return Err(PathValidationError::Empty);
    }

    let parent = parent_dir(path);
    if !parent.is_dir() {
        return Err(PathValidationError::ParentMissing(parent));
    }

    let probe = parent.join(format!(".dashkeeper-probe-{}", Uuid::new_v4()));
    match std::fs::File::create(&probe) {
        Ok(file) => {
            drop(file);
            if let Err(e) = std::fs::remove_file(&probe) {
                warn!("could not remove probe file {}: {e}", probe.display());
            }
            Ok(())
        }
        Err(source) => Err(PathValidationError::NotWritable {
            dir: parent,
            source,
        }),
    }
}

/// Parent of `path`, treating a bare filename as relative to the current
/// directory.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

// ── Platform permission checks ────────────────────────────────────────────────

#[cfg(unix)]
fn readable(path: &Path) -> bool {
    access_allows(path, libc::R_OK)
}

#[cfg(unix)]
fn writable(path: &Path) -> bool {
    access_allows(path, libc::W_OK)
}

#[cfg(unix)]
fn access_allows(path: &Path, mode: libc::c_int) -> bool {
    use std::os::unix::ffi::OsStrExt;

    // A path with an interior NUL cannot exist on disk.
    let Ok(cpath) = std::ffi::CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(cpath.as_ptr(), mode) == 0 }
}

#[cfg(not(unix))]
fn readable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok()
}

#[cfg(not(unix))]
fn writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
