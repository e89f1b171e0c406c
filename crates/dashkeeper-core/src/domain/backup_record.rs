//! Backup record naming scheme.
//!
//! A backup is a plain file whose NAME carries all of its metadata:
//!
//! ```text
//! <config name>_<epoch seconds>.yaml
//! e.g.  bookmarks_1714502400.yaml
//! ```
//!
//! The timestamp is the source file's modification time at the moment the
//! backup was taken, so re-backing-up an unmodified file reproduces the same
//! name and overwrites the previous copy instead of accumulating duplicates.
//!
//! Formatting and parsing live together in this module so the store that
//! creates backups and the listing that reads them back can never drift
//! apart.

use std::path::Path;

use crate::domain::descriptor::DEFAULT_EXTENSION;

/// One backup file, as recovered from its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Configuration name the backup belongs to.
    pub name: String,
    /// Source file mtime (seconds since the Unix epoch) when the backup was
    /// taken.
    pub timestamp: u64,
    /// Absolute path of the backup file.
    pub path: std::path::PathBuf,
}

impl BackupRecord {
    /// Parses a path in the backup directory into a record.
    ///
    /// Returns `None` for files that do not follow the naming scheme (wrong
    /// extension, no `_<seconds>` suffix, empty name); such files are ignored
    /// by listings rather than treated as errors.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let (name, timestamp) = parse_backup_file_name(file_name)?;
        Some(Self {
            name,
            timestamp,
            path: path.to_path_buf(),
        })
    }
}

/// Formats the backup filename for `name` taken at `timestamp` epoch seconds.
pub fn backup_file_name(name: &str, timestamp: u64) -> String {
    format!("{name}_{timestamp}.{DEFAULT_EXTENSION}")
}

/// Splits a backup filename back into `(name, timestamp)`.
///
/// The name may itself contain underscores; the timestamp is everything after
/// the LAST underscore, so the split is unambiguous.
pub fn parse_backup_file_name(file_name: &str) -> Option<(String, u64)> {
    let stem = file_name.strip_suffix(&format!(".{DEFAULT_EXTENSION}"))?;
    let (name, seconds) = stem.rsplit_once('_')?;
    if name.is_empty() {
        return None;
    }
    let timestamp = seconds.parse::<u64>().ok()?;
    Some((name.to_string(), timestamp))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_then_parse_round_trips() {
        let file_name = backup_file_name("bookmarks", 1714502400);

        assert_eq!(file_name, "bookmarks_1714502400.yaml");
        assert_eq!(
            parse_backup_file_name(&file_name),
            Some(("bookmarks".to_string(), 1714502400))
        );
    }

    #[test]
    fn test_parse_keeps_underscores_in_the_name() {
        // Only the suffix after the last underscore is the timestamp.
        let parsed = parse_backup_file_name("my_custom_dash_1700000000.yaml");

        assert_eq!(parsed, Some(("my_custom_dash".to_string(), 1700000000)));
    }

    #[test]
    fn test_parse_rejects_wrong_extension() {
        assert_eq!(parse_backup_file_name("bookmarks_1700000000.json"), None);
        assert_eq!(parse_backup_file_name("bookmarks_1700000000"), None);
    }

    #[test]
    fn test_parse_rejects_missing_or_bad_timestamp() {
        assert_eq!(parse_backup_file_name("bookmarks.yaml"), None);
        assert_eq!(parse_backup_file_name("bookmarks_.yaml"), None);
        assert_eq!(parse_backup_file_name("bookmarks_yesterday.yaml"), None);
    }

    #[test]
    fn test_parse_rejects_empty_name() {
        assert_eq!(parse_backup_file_name("_1700000000.yaml"), None);
    }

    #[test]
    fn test_from_path_builds_a_record() {
        let path = PathBuf::from("/var/lib/dash/backups/settings_1714502400.yaml");

        let record = BackupRecord::from_path(&path).expect("record");

        assert_eq!(record.name, "settings");
        assert_eq!(record.timestamp, 1714502400);
        assert_eq!(record.path, path);
    }

    #[test]
    fn test_from_path_ignores_foreign_files() {
        assert!(BackupRecord::from_path(Path::new("/tmp/README.md")).is_none());
        assert!(BackupRecord::from_path(Path::new("/tmp/notes.yaml")).is_none());
    }
}
