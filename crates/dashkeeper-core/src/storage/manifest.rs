//! Persistent name → path manifest.
//!
//! The manifest maps every registered configuration name to the absolute
//! path its file lives at. It is stored as a flat JSON object
//! (`config_paths.json`) so users can inspect and fix it by hand:
//!
//! ```json
//! {
//!   "bookmarks": "/opt/dash/bookmarks.yaml",
//!   "settings": "/mnt/nas/shared/settings.yaml"
//! }
//! ```
//!
//! Loading is deliberately forgiving: a missing, unreadable, or corrupt
//! manifest falls back to default paths and rewrites the file, because the
//! application must still start when this file is damaged. Reassignment is
//! the opposite: [`PathManifest::set`] validates the new path and persists
//! the whole map BEFORE the in-memory entry changes, so a failure of either
//! step leaves both the file and the running state untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::access::{self, PathValidationError};
use crate::paths::AppPaths;
use crate::storage::write_atomic;

/// Errors from manifest reassignment or persistence.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The name is not part of the registry this manifest was built from.
    #[error("unknown configuration name: {0}")]
    UnknownName(String),

    /// The candidate path failed validation (see `access::validate_path`).
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathValidationError),

    /// The manifest map could not be serialized.
    #[error("could not serialize path manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The manifest file could not be written.
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The name → absolute path mapping for all registered configurations.
///
/// After [`load`](PathManifest::load) the map is complete: every registered
/// name has an entry, defaulted to `<app dir>/<name>.yaml` when the file had
/// none. Unknown keys found in the file are dropped.
#[derive(Debug)]
pub struct PathManifest {
    paths: AppPaths,
    entries: BTreeMap<String, PathBuf>,
}

impl PathManifest {
    /// Loads the manifest for the given registry names.
    ///
    /// Never fails: any problem reading or parsing the file is logged, the
    /// affected entries fall back to defaults, and the file is rewritten so
    /// disk state matches memory again. A rewrite failure is also non-fatal
    /// (the defaults then live in memory only).
    pub fn load(paths: AppPaths, names: impl IntoIterator<Item = String>) -> Self {
        let manifest_path = paths.manifest_path();
        let stored = match std::fs::read_to_string(&manifest_path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        "could not parse {}: {e}; regenerating defaults",
                        manifest_path.display()
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "no path manifest at {}; writing defaults",
                    manifest_path.display()
                );
                BTreeMap::new()
            }
            Err(e) => {
                warn!(
                    "could not read {}: {e}; regenerating defaults",
                    manifest_path.display()
                );
                BTreeMap::new()
            }
        };

        let mut entries = BTreeMap::new();
        let mut dirty = false;
        for name in names {
            match stored.get(&name) {
                // Older manifests stored "" for "use the default".
                Some(path) if !path.is_empty() => {
                    entries.insert(name, PathBuf::from(path));
                }
                _ => {
                    let default = paths.default_config_path(&name);
                    entries.insert(name, default);
                    dirty = true;
                }
            }
        }
        for unknown in stored.keys().filter(|k| !entries.contains_key(*k)) {
            debug!("dropping unknown manifest entry: {unknown}");
            dirty = true;
        }

        let manifest = Self { paths, entries };
        if dirty {
            if let Err(e) = manifest.persist(&manifest.entries) {
                warn!("could not rewrite path manifest: {e}");
            }
        }
        manifest
    }

    /// Resolves `name` to its configured path, falling back to the default
    /// location. Never empty.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.entries
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.paths.default_config_path(name))
    }

    /// Reassigns `name` to `path`.
    ///
    /// The path must survive `access::validate_path` (existing, writable
    /// parent). The updated map is persisted atomically first; only a
    /// successful persist updates the in-memory entry, so the manifest never
    /// diverges between disk and memory.
    ///
    /// # Errors
    ///
    /// [`ManifestError::UnknownName`] for names outside the registry,
    /// [`ManifestError::InvalidPath`] for rejected paths, and the
    /// serialize/io variants when persisting fails.
    pub fn set(&mut self, name: &str, path: &Path) -> Result<(), ManifestError> {
        if !self.entries.contains_key(name) {
            return Err(ManifestError::UnknownName(name.to_string()));
        }
        access::validate_path(path)?;

        let mut next = self.entries.clone();
        next.insert(name.to_string(), path.to_path_buf());
        self.persist(&next)?;
        self.entries = next;
        info!("configuration {name} now resolves to {}", path.display());
        Ok(())
    }

    /// Iterates over `(name, path)` entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_path()))
    }

    fn persist(&self, entries: &BTreeMap<String, PathBuf>) -> Result<(), ManifestError> {
        let json = serde_json::to_string_pretty(entries)?;
        let manifest_path = self.paths.manifest_path();
        write_atomic(&manifest_path, json.as_bytes()).map_err(|source| ManifestError::Io {
            path: manifest_path,
            source,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
