//! Filesystem persistence: the path manifest and the backup store.
//!
//! Both stores write through [`write_atomic`], as does the manager when it
//! writes configuration content. A crash mid-write leaves either the old
//! file or the new file on disk, never a truncated mixture.

use std::io;
use std::path::Path;

use uuid::Uuid;

pub mod backup;
pub mod manifest;

pub use backup::{BackupError, BackupStore};
pub use manifest::{ManifestError, PathManifest};

/// Writes `bytes` to `path` through a temporary file in the same directory
/// followed by a rename over the target.
///
/// The temporary name embeds a random component so concurrent writers cannot
/// collide on it; a failed rename removes the temporary file again.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

    let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));
    std::fs::write(&tmp, bytes)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_the_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("out.json");

        write_atomic(&target, b"{}").expect("write");

        assert_eq!(std::fs::read(&target).expect("read"), b"{}");
    }

    #[test]
    fn test_write_atomic_replaces_existing_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("out.json");
        std::fs::write(&target, b"old").expect("seed");

        write_atomic(&target, b"new").expect("write");

        assert_eq!(std::fs::read(&target).expect("read"), b"new");
    }

    #[test]
    fn test_write_atomic_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("out.json");

        write_atomic(&target, b"data").expect("write");

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .expect("read_dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.json".to_string()]);
    }

    #[test]
    fn test_write_atomic_fails_when_parent_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("no/such/dir/out.json");

        assert!(write_atomic(&target, b"data").is_err());
    }
}
