//! Privilege elevation through the system `sudo` helper.

#![cfg(unix)]

use std::path::Path;
use std::process::Command;

use tracing::{debug, error};

use super::{ElevateError, Elevator};

const HELPER: &str = "sudo";

/// Elevator that shells out to `sudo chown` and `sudo chmod`.
///
/// Both commands are built as argument vectors; no string ever passes
/// through a shell, so paths with spaces or metacharacters are safe.
/// Elevation succeeds only when BOTH steps exit zero: a file that is owned
/// correctly but left with the wrong mode is still unwritable.
#[derive(Debug, Default, Clone, Copy)]
pub struct SudoElevator;

impl SudoElevator {
    pub fn new() -> Self {
        Self
    }

    /// Current user from `USER` (or `USERNAME`, which some display managers
    /// export instead). An empty variable counts as unset.
    fn current_user() -> Result<String, ElevateError> {
        ["USER", "USERNAME"]
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|user| !user.is_empty()))
            .ok_or(ElevateError::UnknownUser)
    }

    fn run_helper(action: &str, args: &[&str]) -> Result<(), ElevateError> {
        debug!("running {HELPER} {action} {args:?}");
        let output = Command::new(HELPER)
            .arg(action)
            .args(args)
            .output()
            .map_err(|source| ElevateError::Spawn {
                helper: HELPER.to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("{HELPER} {action} failed ({}): {stderr}", output.status);
            Err(ElevateError::HelperFailed {
                helper: HELPER.to_string(),
                action: action.to_string(),
                status: output.status,
                stderr,
            })
        }
    }
}

impl Elevator for SudoElevator {
    fn elevate(&self, path: &Path, mode: u32) -> Result<(), ElevateError> {
        let user = Self::current_user()?;
        let group = std::env::var("GROUP").unwrap_or_else(|_| user.clone());
        let path_arg = path.to_string_lossy();

        Self::run_helper("chown", &[&format!("{user}:{group}"), &path_arg])?;
        Self::run_helper("chmod", &[&format!("{mode:o}"), &path_arg])?;

        debug!("elevated access to {}", path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
