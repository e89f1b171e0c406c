//! Configuration manager: the facade the editor talks to.
//!
//! Owns the descriptor registry, the path manifest, the backup store, and an
//! injected [`Elevator`], and sequences them into the operations the rest of
//! the application uses. One manager is created per application directory
//! and passed by reference to every collaborator; there is no global
//! instance.
//!
//! # Write path
//!
//! ```text
//! write_config(name, doc)
//!  ├─ resolve path (manifest; unknown name fails fast)
//!  ├─ back up current file          -- if it exists and backups are enabled
//!  ├─ check access ─ denied ─► elevate once ─ failed ─► abort, no write
//!  ├─ create parent directories
//!  ├─ encode + temp file + rename   -- never a half-written target
//!  └─ chmod to descriptor mode      -- failure logged, not fatal
//! ```
//!
//! Reads are deliberately softer: a missing or unreadable file yields the
//! empty document so the editor can always open, while a file that EXISTS
//! but does not parse is a hard error — overwriting a corrupt-but-present
//! file would destroy whatever the user still has on disk.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::access::{self, AccessResult};
use crate::codec::{self, CodecError};
use crate::domain::backup_record::BackupRecord;
use crate::domain::descriptor::{builtin_registry, ConfigDescriptor};
use crate::domain::document::{empty_document, Document};
use crate::elevate::{platform_elevator, ElevateError, Elevator};
use crate::paths::AppPaths;
use crate::storage::{write_atomic, BackupError, BackupStore, ManifestError, PathManifest};

/// Errors surfaced by [`ConfigManager`] operations.
///
/// Every variant is recoverable; nothing here ever terminates the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The name is not in the registry. This is a programmer error, not a
    /// runtime condition, and is rejected before any I/O.
    #[error("unknown configuration name: {0}")]
    UnknownConfig(String),

    /// A path reassignment was rejected.
    #[error("invalid path for {name}: {reason}")]
    InvalidPath { name: String, reason: String },

    /// Access was denied and elevation was not applicable.
    #[error("access denied to {path}: {reason}")]
    AccessDenied { path: PathBuf, reason: String },

    /// Access was denied and the elevation attempt failed too. Carries the
    /// ORIGINAL denial reason; the elevation error is the source.
    #[error("cannot access {path}: {reason} (elevation failed: {source})")]
    ElevationFailed {
        path: PathBuf,
        reason: String,
        #[source]
        source: ElevateError,
    },

    /// An existing file's content parsed in no accepted format.
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// The document cannot be represented in the target's format.
    #[error("could not encode document for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Writing the target (or its parent directories) failed.
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path manifest could not be persisted.
    #[error("could not persist path manifest: {0}")]
    ManifestPersist(#[source] ManifestError),

    /// A backup could not be taken.
    #[error("backup failed: {0}")]
    Backup(#[source] BackupError),

    /// A restore could not be completed.
    #[error("restore failed: {0}")]
    Restore(#[source] BackupError),
}

/// One row of the per-configuration status report.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigStatus {
    pub name: String,
    pub path: PathBuf,
    pub exists: bool,
    pub accessible: bool,
    /// Denial reason from the access check, when not accessible.
    pub error: Option<String>,
    pub required: bool,
    pub backup_enabled: bool,
}

/// Outcome of validating the required configurations.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// `true` when every required configuration is present and accessible.
    pub passed: bool,
    /// One line per failing descriptor, e.g.
    /// `bookmarks: file not found at /opt/dash/bookmarks.yaml`.
    pub failures: Vec<String>,
}

/// The orchestrating facade over registry, manifest, backups, and elevation.
pub struct ConfigManager {
    paths: AppPaths,
    registry: BTreeMap<String, ConfigDescriptor>,
    manifest: Mutex<PathManifest>,
    backups: BackupStore,
    elevator: Box<dyn Elevator>,
    name_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConfigManager {
    /// Creates a manager over `app_dir` with the built-in registry and the
    /// platform's native elevator.
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self::with_registry(AppPaths::new(app_dir), builtin_registry(), platform_elevator())
    }

    /// Built-in registry, custom elevator. The constructor tests reach for.
    pub fn with_elevator(app_dir: impl Into<PathBuf>, elevator: Box<dyn Elevator>) -> Self {
        Self::with_registry(AppPaths::new(app_dir), builtin_registry(), elevator)
    }

    /// Full control over registry and elevator.
    pub fn with_registry(
        paths: AppPaths,
        registry: Vec<ConfigDescriptor>,
        elevator: Box<dyn Elevator>,
    ) -> Self {
        let names: Vec<String> = registry.iter().map(|d| d.name.clone()).collect();
        let manifest = PathManifest::load(paths.clone(), names);
        let backups = BackupStore::new(paths.backup_dir());
        let registry = registry
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();
        Self {
            paths,
            registry,
            manifest: Mutex::new(manifest),
            backups,
            elevator,
            name_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The directory layout this manager operates in.
    pub fn app_paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Registered descriptors in name order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ConfigDescriptor> {
        self.registry.values()
    }

    // ── Path operations ──────────────────────────────────────────────────────

    /// Resolves `name` to its current path. Never empty for a registered
    /// name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownConfig`] for unregistered names.
    pub fn config_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        self.descriptor(name)?;
        Ok(self.lock_manifest().resolve(name))
    }

    /// Reassigns `name` to `path` after validating it (existing, writable
    /// parent). The manifest is persisted before the change takes effect;
    /// on failure nothing changes.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownConfig`], [`ConfigError::InvalidPath`], or
    /// [`ConfigError::ManifestPersist`].
    pub fn set_config_path(&self, name: &str, path: &Path) -> Result<(), ConfigError> {
        self.descriptor(name)?;
        self.lock_manifest()
            .set(name, path)
            .map_err(|e| Self::manifest_error(name, e))
    }

    // ── Document operations ──────────────────────────────────────────────────

    /// Reads the document for `name`.
    ///
    /// Missing files and unresolvable access denials yield the empty
    /// document (the shortfall of a required name shows up in
    /// [`status`](Self::status) and [`validate_all`](Self::validate_all)
    /// instead). Elevation is attempted at most once.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownConfig`], or [`ConfigError::Parse`] when the
    /// file exists but its content is not valid in any accepted format.
    pub fn read_config(&self, name: &str) -> Result<Document, ConfigError> {
        let descriptor = self.descriptor(name)?.clone();
        let path = self.lock_manifest().resolve(name);

        if !path.exists() {
            if descriptor.required {
                warn!(
                    "required configuration {name} not found at {}",
                    path.display()
                );
            } else {
                debug!(
                    "configuration {name} not found at {}; returning empty document",
                    path.display()
                );
            }
            return Ok(empty_document());
        }

        match access::check_access(&path) {
            AccessResult::DeniedRead { reason } | AccessResult::DeniedWrite { reason } => {
                if let Err(e) = self.elevator.elevate(&path, descriptor.mode) {
                    warn!(
                        "cannot access {}: {reason} (elevation failed: {e}); returning empty document",
                        path.display()
                    );
                    return Ok(empty_document());
                }
                info!("elevated access to {}", path.display());
            }
            AccessResult::Ok | AccessResult::MissingParent { .. } => {}
        }

        // Read raw bytes so non-UTF-8 content reaches the codec and comes
        // back as a Parse error; only I/O failures degrade to empty here.
        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} vanished between check and read", path.display());
                return Ok(empty_document());
            }
            Err(e) => {
                warn!(
                    "could not read {}: {e}; returning empty document",
                    path.display()
                );
                return Ok(empty_document());
            }
        };

        codec::decode(&content, codec::format_for_path(&path))
            .map_err(|source| ConfigError::Parse { path, source })
    }

    /// Writes `document` as the new content of `name`.
    ///
    /// Follows the write path described in the module docs; any failure
    /// before the final rename aborts without touching the target.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownConfig`], [`ConfigError::Backup`],
    /// [`ConfigError::AccessDenied`], [`ConfigError::ElevationFailed`],
    /// [`ConfigError::Encode`], or [`ConfigError::Write`].
    pub fn write_config(&self, name: &str, document: &Document) -> Result<(), ConfigError> {
        let descriptor = self.descriptor(name)?.clone();
        let path = self.lock_manifest().resolve(name);

        let lock = self.name_lock(name);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        if path.exists() && descriptor.backup_enabled {
            self.backups
                .backup(name, &path)
                .map_err(ConfigError::Backup)?;
        }

        self.ensure_writable(&path, &descriptor)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        let format = codec::format_for_path(&path);
        let content = codec::encode(document, format).map_err(|source| ConfigError::Encode {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, content.as_bytes()).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        set_mode(&path, descriptor.mode);
        info!("wrote configuration {name} to {}", path.display());
        Ok(())
    }

    // ── Reporting ────────────────────────────────────────────────────────────

    /// Per-name status report, keyed by configuration name.
    ///
    /// Pure: performs access checks but never elevates, probes, or mutates.
    pub fn status(&self) -> BTreeMap<String, ConfigStatus> {
        let manifest = self.lock_manifest();
        self.registry
            .values()
            .map(|descriptor| {
                let path = manifest.resolve(&descriptor.name);
                let result = access::check_access(&path);
                let status = ConfigStatus {
                    name: descriptor.name.clone(),
                    exists: path.exists(),
                    accessible: result.is_ok(),
                    error: result.reason().map(str::to_string),
                    required: descriptor.required,
                    backup_enabled: descriptor.backup_enabled,
                    path,
                };
                (descriptor.name.clone(), status)
            })
            .collect()
    }

    /// Validates the REQUIRED configurations only.
    ///
    /// A required name fails when its file is inaccessible (denial reason
    /// included) or simply absent. Optional names never fail validation.
    pub fn validate_all(&self) -> ValidationReport {
        let manifest = self.lock_manifest();
        let mut failures = Vec::new();
        for descriptor in self.registry.values().filter(|d| d.required) {
            let name = &descriptor.name;
            let path = manifest.resolve(name);
            match access::check_access(&path) {
                AccessResult::Ok => {
                    if !path.exists() {
                        failures.push(format!("{name}: file not found at {}", path.display()));
                    }
                }
                denied => {
                    // reason() is always Some for a denial.
                    let reason = denied.reason().unwrap_or("access denied");
                    failures.push(format!("{name}: access denied: {reason}"));
                }
            }
        }
        ValidationReport {
            passed: failures.is_empty(),
            failures,
        }
    }

    // ── Backup operations ────────────────────────────────────────────────────

    /// Lists the backups recorded for `name`, newest first.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownConfig`] or [`ConfigError::Backup`].
    pub fn list_backups(&self, name: &str) -> Result<Vec<BackupRecord>, ConfigError> {
        self.descriptor(name)?;
        self.backups.list(name).map_err(ConfigError::Backup)
    }

    /// Restores `backup_path` over the live file for `name`.
    ///
    /// The current live content (if any) is backed up first, so the restore
    /// itself can be undone.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownConfig`] or [`ConfigError::Restore`].
    pub fn restore_backup(&self, name: &str, backup_path: &Path) -> Result<(), ConfigError> {
        self.descriptor(name)?;
        let target = self.lock_manifest().resolve(name);

        let lock = self.name_lock(name);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        self.backups
            .restore(name, backup_path, &target)
            .map_err(ConfigError::Restore)
    }

    /// Deletes one backup record.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Backup`] when the path is not a record of this store
    /// or removal fails.
    pub fn delete_backup(&self, backup_path: &Path) -> Result<(), ConfigError> {
        self.backups.delete(backup_path).map_err(ConfigError::Backup)
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn descriptor(&self, name: &str) -> Result<&ConfigDescriptor, ConfigError> {
        self.registry
            .get(name)
            .ok_or_else(|| ConfigError::UnknownConfig(name.to_string()))
    }

    fn lock_manifest(&self) -> MutexGuard<'_, PathManifest> {
        // A poisoned lock still holds valid data; a panicked writer never
        // leaves the manifest half-updated (set swaps the map when done).
        self.manifest.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Per-name lock so two writers of the SAME configuration cannot
    /// interleave backup and write steps, while different names proceed in
    /// parallel.
    fn name_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.name_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Access gate for writes: elevate once on an ownership/mode denial;
    /// a missing parent is not elevatable (the helper reassigns ownership,
    /// it does not create directories).
    fn ensure_writable(
        &self,
        path: &Path,
        descriptor: &ConfigDescriptor,
    ) -> Result<(), ConfigError> {
        match access::check_access(path) {
            AccessResult::Ok => Ok(()),
            AccessResult::MissingParent { reason } => Err(ConfigError::AccessDenied {
                path: path.to_path_buf(),
                reason,
            }),
            AccessResult::DeniedRead { reason } | AccessResult::DeniedWrite { reason } => {
                debug!(
                    "access denied to {}: {reason}; attempting elevation",
                    path.display()
                );
                match self.elevator.elevate(path, descriptor.mode) {
                    Ok(()) => {
                        info!("elevated access to {}", path.display());
                        Ok(())
                    }
                    Err(source) => Err(ConfigError::ElevationFailed {
                        path: path.to_path_buf(),
                        reason,
                        source,
                    }),
                }
            }
        }
    }

    fn manifest_error(name: &str, err: ManifestError) -> ConfigError {
        match err {
            ManifestError::UnknownName(n) => ConfigError::UnknownConfig(n),
            ManifestError::InvalidPath(e) => ConfigError::InvalidPath {
                name: name.to_string(),
                reason: e.to_string(),
            },
            persist @ (ManifestError::Serialize(_) | ManifestError::Io { .. }) => {
                ConfigError::ManifestPersist(persist)
            }
        }
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)) {
        warn!("could not set mode {mode:o} on {}: {e}", path.display());
    }
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) {}

// ── Tests ─────────────────────────────────────────────────────────────────────
