//! Report assembly for the doctor binary.
//!
//! Everything that can be unit-tested lives here rather than in `main.rs`:
//! resolving which directory to inspect, and rendering the status table and
//! validation summary as plain text.

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use dashkeeper_core::{ConfigManager, ConfigStatus, ValidationReport};

/// Environment variable naming the application directory to inspect.
pub const APP_DIR_ENV: &str = "DASHKEEPER_DIR";

/// Picks the application directory to inspect.
///
/// Resolution order: `DASHKEEPER_DIR`, then the directory holding the
/// doctor executable (the usual deployment puts the binary next to the
/// configuration), then the current working directory.
pub fn resolve_app_dir() -> PathBuf {
    if let Some(dir) = env::var_os(APP_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.to_path_buf();
        }
    }
    PathBuf::from(".")
}

/// Renders one aligned line per configuration name.
///
/// The state column is `ok`, `missing`, or `denied`; a denial reason is
/// appended at the end of the line so it cannot break the alignment.
pub fn render_status(
    statuses: &BTreeMap<String, ConfigStatus>,
    backup_counts: &BTreeMap<String, usize>,
) -> String {
    let name_width = statuses.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for status in statuses.values() {
        let state = if !status.exists {
            "missing"
        } else if status.accessible {
            "ok"
        } else {
            "denied"
        };
        let count = backup_counts.get(&status.name).copied().unwrap_or(0);
        let backups = format!("{count} backup{}", if count == 1 { "" } else { "s" });
        out.push_str(&format!(
            "{:<name_width$}  {:<8}  {:<7}  {:<11}  {}",
            status.name,
            if status.required { "required" } else { "optional" },
            state,
            backups,
            status.path.display(),
        ));
        if let Some(reason) = &status.error {
            out.push_str(&format!("  ({reason})"));
        }
        out.push('\n');
    }
    out
}

/// Renders the validation verdict, one indented line per failure.
pub fn render_validation(report: &ValidationReport) -> String {
    if report.passed {
        return "validation: all required configurations are present and accessible\n".to_string();
    }
    let mut out = String::from("validation: FAILED\n");
    for failure in &report.failures {
        out.push_str(&format!("  - {failure}\n"));
    }
    out
}

/// Runs the full health check and returns the report text plus the verdict.
pub fn build_report(manager: &ConfigManager) -> (String, bool) {
    let statuses = manager.status();
    let mut backup_counts = BTreeMap::new();
    for name in statuses.keys() {
        let count = manager
            .list_backups(name)
            .map(|records| records.len())
            .unwrap_or(0);
        backup_counts.insert(name.clone(), count);
    }
    let report = manager.validate_all();

    let mut text = render_status(&statuses, &backup_counts);
    text.push('\n');
    text.push_str(&render_validation(&report));
    (text, report.passed)
}
