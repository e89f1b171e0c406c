//! Integration tests for access denial and privilege elevation.
//!
//! # Purpose
//!
//! Configuration files on a dashboard host are routinely owned by root or
//! another service account, so the manager has to cope with files it cannot
//! touch. These tests pin down that behavior end to end:
//!
//! - A denied read degrades to an empty document instead of an error.
//! - A denied write attempts exactly ONE elevation and, when that fails,
//!   surfaces the original denial reason to the caller.
//! - A successful elevation (simulated with a mock that repairs the file
//!   mode) lets the operation proceed.
//! - Status and validation report denials without ever elevating.
//!
//! The denials are produced with real `chmod` calls, which is why the whole
//! file is Unix-only and why every test skips itself under root (root
//! bypasses permission bits, so nothing here can be provoked).

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use dashkeeper_core::{empty_document, ConfigError, ConfigManager, Document, MockElevator};

/// Permission-bit denials cannot be provoked when the suite runs as root.
fn running_as_root() -> bool {
    // SAFETY: geteuid takes no arguments and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

fn chmod(path: &Path, mode: u32) {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("chmod");
}

fn doc(yaml: &str) -> Document {
    serde_yaml::from_str(yaml).expect("test document")
}

/// A read of an unreadable file tries one elevation, and when that fails
/// the caller still gets an empty document rather than an error.
#[test]
fn denied_read_falls_back_to_empty_document() {
    if running_as_root() {
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let elevator = MockElevator::failing();
    let manager = ConfigManager::with_elevator(dir.path(), Box::new(elevator.clone()));
    manager
        .write_config("settings", &doc("theme: dark\n"))
        .expect("seed");
    let live = manager.config_path("settings").expect("path");
    chmod(&live, 0o000);

    let document = manager.read_config("settings").expect("read must not error");

    assert_eq!(document, empty_document());
    assert_eq!(elevator.call_count(), 1);
    chmod(&live, 0o644);
}

/// When the elevator actually repairs the file (here: a mock that chmods it
/// back), the read proceeds and returns the real content.
#[test]
fn denied_read_recovers_after_successful_elevation() {
    if running_as_root() {
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let elevator = MockElevator::with_handler(|path, mode| {
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|_| {
            dashkeeper_core::ElevateError::Unsupported
        })
    });
    let manager = ConfigManager::with_elevator(dir.path(), Box::new(elevator.clone()));
    manager
        .write_config("settings", &doc("theme: dark\n"))
        .expect("seed");
    let live = manager.config_path("settings").expect("path");
    chmod(&live, 0o000);

    let document = manager.read_config("settings").expect("read");

    assert_eq!(document, doc("theme: dark\n"));
    assert_eq!(elevator.calls(), vec![(live, 0o644)]);
}

/// A denied write with a failing elevator aborts with the ORIGINAL denial
/// reason, calls the elevator exactly once, and leaves the file untouched.
#[test]
fn denied_write_surfaces_original_reason_when_elevation_fails() {
    if running_as_root() {
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let elevator = MockElevator::failing();
    let manager = ConfigManager::with_elevator(dir.path(), Box::new(elevator.clone()));
    manager
        .write_config("settings", &doc("theme: dark\n"))
        .expect("seed");
    let live = manager.config_path("settings").expect("path");
    let before = fs::read(&live).expect("bytes");
    chmod(&live, 0o444);

    let err = manager
        .write_config("settings", &doc("theme: light\n"))
        .expect_err("write must fail");

    match err {
        ConfigError::ElevationFailed { reason, .. } => {
            assert!(reason.contains("no write permission"), "reason: {reason}");
        }
        other => panic!("expected ElevationFailed, got {other:?}"),
    }
    assert_eq!(elevator.call_count(), 1);
    assert_eq!(
        fs::read(&live).expect("bytes"),
        before,
        "failed write must not alter the target"
    );
    chmod(&live, 0o644);
}

/// A write denied by mode bits goes through after the elevator repairs them.
#[test]
fn denied_write_succeeds_after_successful_elevation() {
    if running_as_root() {
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let elevator = MockElevator::with_handler(|path, mode| {
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|_| {
            dashkeeper_core::ElevateError::Unsupported
        })
    });
    let manager = ConfigManager::with_elevator(dir.path(), Box::new(elevator.clone()));
    manager
        .write_config("settings", &doc("theme: dark\n"))
        .expect("seed");
    let live = manager.config_path("settings").expect("path");
    chmod(&live, 0o444);

    manager
        .write_config("settings", &doc("theme: light\n"))
        .expect("write after elevation");

    assert_eq!(elevator.call_count(), 1);
    assert_eq!(
        manager.read_config("settings").expect("read"),
        doc("theme: light\n")
    );
}

/// Status and validation are reporting surfaces: they carry the denial
/// reason but never trigger an elevation attempt.
#[test]
fn reporting_carries_denial_reasons_without_elevating() {
    if running_as_root() {
        return;
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let elevator = MockElevator::succeeding();
    let manager = ConfigManager::with_elevator(dir.path(), Box::new(elevator.clone()));
    manager
        .write_config("settings", &doc("theme: dark\n"))
        .expect("seed");
    manager
        .write_config("bookmarks", &doc("categories: []\n"))
        .expect("seed");
    let live = manager.config_path("settings").expect("path");
    chmod(&live, 0o000);

    let status = manager.status();
    assert!(!status["settings"].accessible);
    assert_eq!(
        status["settings"].error.as_deref(),
        Some("no read permission")
    );
    assert!(status["bookmarks"].accessible);

    let report = manager.validate_all();
    assert!(!report.passed);
    assert_eq!(report.failures.len(), 1);
    assert!(
        report.failures[0].contains("settings: access denied: no read permission"),
        "got: {}",
        report.failures[0]
    );

    assert_eq!(elevator.call_count(), 0, "reporting must never elevate");
    chmod(&live, 0o644);
}

/// A write whose parent directory is gone is a plain denial, not an
/// elevation candidate: the helper reassigns ownership, it cannot create
/// directories.
#[test]
fn missing_parent_denies_write_without_elevation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let elevator = MockElevator::succeeding();
    let manager = ConfigManager::with_elevator(dir.path(), Box::new(elevator.clone()));
    let sub = dir.path().join("mount");
    fs::create_dir(&sub).expect("mkdir");
    manager
        .set_config_path("settings", &sub.join("settings.yaml"))
        .expect("set path");
    fs::remove_dir(&sub).expect("unmount");

    let err = manager
        .write_config("settings", &doc("theme: dark\n"))
        .expect_err("write must fail");

    match err {
        ConfigError::AccessDenied { reason, .. } => {
            assert!(
                reason.contains("parent directory does not exist"),
                "reason: {reason}"
            );
        }
        other => panic!("expected AccessDenied, got {other:?}"),
    }
    assert_eq!(elevator.call_count(), 0);
}
