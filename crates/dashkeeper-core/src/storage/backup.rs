//! Timestamped backup store.
//!
//! Backups are byte-for-byte copies living flat in one directory, named by
//! the scheme in `domain::backup_record`. The timestamp embedded in the name
//! is the SOURCE file's modification time, not the wall clock at copy time:
//! backing up a file nobody has touched reproduces the existing record
//! instead of a duplicate, so repeated saves of identical content cost one
//! backup, not one per save.
//!
//! The store never deletes anything on its own. [`BackupStore::delete`]
//! exists for the editor's backup browser and refuses to remove files that
//! are not records inside the store's directory.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::backup_record::{backup_file_name, BackupRecord};
use crate::storage::write_atomic;

/// Errors from backup creation, listing, restore, or deletion.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The backup directory could not be created.
    #[error("could not create backup directory {dir}: {source}")]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file's metadata could not be read.
    #[error("could not stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying bytes between a live file and a backup failed.
    #[error("could not copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backup directory could not be enumerated.
    #[error("could not read backup directory {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A restore or delete referenced a backup that is not there.
    #[error("backup does not exist: {0}")]
    MissingBackup(PathBuf),

    /// A delete referenced a path that is not a record in this store.
    #[error("not a backup of this store: {0}")]
    ForeignPath(PathBuf),

    /// Removing a backup file failed.
    #[error("could not delete backup {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Backup store over one directory.
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    /// Creates a store over `dir`. The directory itself is created lazily on
    /// the first backup.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copies `source` into the store as a record for `name`.
    ///
    /// A missing source is a no-op (`Ok(None)`): there is nothing to
    /// preserve. The record name embeds the source's mtime, so an unmodified
    /// source overwrites its own previous record.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created, the source cannot be
    /// stat'ed, or the copy itself fails.
    pub fn backup(&self, name: &str, source: &Path) -> Result<Option<BackupRecord>, BackupError> {
        if !source.exists() {
            debug!("nothing to back up for {name}: {} is absent", source.display());
            return Ok(None);
        }

        std::fs::create_dir_all(&self.dir).map_err(|source_err| BackupError::CreateDir {
            dir: self.dir.clone(),
            source: source_err,
        })?;

        let metadata = source.metadata().map_err(|source_err| BackupError::Stat {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let timestamp = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let target = self.dir.join(backup_file_name(name, timestamp));
        std::fs::copy(source, &target).map_err(|source_err| BackupError::Copy {
            from: source.to_path_buf(),
            to: target.clone(),
            source: source_err,
        })?;

        info!("backed up {name} to {}", target.display());
        Ok(Some(BackupRecord {
            name: name.to_string(),
            timestamp,
            path: target,
        }))
    }

    /// Lists the records for `name`, newest first.
    ///
    /// Ordering uses the timestamp PARSED from each filename; lexicographic
    /// order would put `…_999.yaml` after `…_1000.yaml`. Files that do not
    /// parse as records are ignored, and a store whose directory does not
    /// exist yet is simply empty.
    pub fn list(&self, name: &str) -> Result<Vec<BackupRecord>, BackupError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|source| BackupError::ReadDir {
            dir: self.dir.clone(),
            source,
        })?;

        let mut records: Vec<BackupRecord> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| BackupRecord::from_path(&entry.path()))
            .filter(|record| record.name == name)
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// Restores `backup_path` over `target`.
    ///
    /// Whatever currently occupies the target is backed up first, so a
    /// restore can itself be undone. The target is replaced atomically.
    ///
    /// # Errors
    ///
    /// Fails when the backup does not exist, the pre-restore backup fails,
    /// or the copy fails.
    pub fn restore(&self, name: &str, backup_path: &Path, target: &Path) -> Result<(), BackupError> {
        if !backup_path.exists() {
            return Err(BackupError::MissingBackup(backup_path.to_path_buf()));
        }

        if target.exists() {
            self.backup(name, target)?;
        }

        let bytes = std::fs::read(backup_path).map_err(|source| BackupError::Copy {
            from: backup_path.to_path_buf(),
            to: target.to_path_buf(),
            source,
        })?;
        write_atomic(target, &bytes).map_err(|source| BackupError::Copy {
            from: backup_path.to_path_buf(),
            to: target.to_path_buf(),
            source,
        })?;

        info!("restored {name} from {}", backup_path.display());
        Ok(())
    }

    /// Deletes one record from the store.
    ///
    /// # Errors
    ///
    /// [`BackupError::ForeignPath`] when the path does not name a record
    /// inside this store's directory, [`BackupError::MissingBackup`] when it
    /// no longer exists, or [`BackupError::Delete`] when removal fails.
    pub fn delete(&self, backup_path: &Path) -> Result<(), BackupError> {
        if BackupRecord::from_path(backup_path).is_none() {
            return Err(BackupError::ForeignPath(backup_path.to_path_buf()));
        }

        let canon_dir = self
            .dir
            .canonicalize()
            .map_err(|_| BackupError::ForeignPath(backup_path.to_path_buf()))?;
        let canon = backup_path.canonicalize().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                BackupError::MissingBackup(backup_path.to_path_buf())
            } else {
                BackupError::Delete {
                    path: backup_path.to_path_buf(),
                    source,
                }
            }
        })?;
        if canon.parent() != Some(canon_dir.as_path()) {
            return Err(BackupError::ForeignPath(backup_path.to_path_buf()));
        }

        std::fs::remove_file(&canon).map_err(|source| BackupError::Delete {
            path: canon.clone(),
            source,
        })?;
        info!("deleted backup {}", canon.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
