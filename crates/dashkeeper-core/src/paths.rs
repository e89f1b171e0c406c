//! Application directory layout.
//!
//! Everything Dashkeeper persists lives under one application directory:
//!
//! ```text
//! <app dir>/
//! ├── config_paths.json     -- path manifest (storage::manifest)
//! ├── backups/              -- backup store  (storage::backup)
//! ├── bookmarks.yaml        -- default location for the "bookmarks" config
//! └── settings.yaml         -- ...and so on for each registered name
//! ```
//!
//! Individual configurations may be remapped anywhere on disk through the
//! manifest; the manifest and the backup directory themselves are fixed
//! relative to the application directory.

use std::path::{Path, PathBuf};

use crate::domain::descriptor::DEFAULT_EXTENSION;

/// Leaf name of the path manifest file.
pub const MANIFEST_FILE: &str = "config_paths.json";

/// Leaf name of the backup directory.
pub const BACKUP_DIR: &str = "backups";

/// Resolved locations under one application directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    app_dir: PathBuf,
}

impl AppPaths {
    /// Creates the layout rooted at `app_dir`. Nothing is touched on disk.
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
        }
    }

    /// The application directory itself.
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Location of the path manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.app_dir.join(MANIFEST_FILE)
    }

    /// Location of the backup directory.
    pub fn backup_dir(&self) -> PathBuf {
        self.app_dir.join(BACKUP_DIR)
    }

    /// Default location of a configuration file: `<app dir>/<name>.yaml`.
    pub fn default_config_path(&self, name: &str) -> PathBuf {
        self.app_dir.join(format!("{name}.{DEFAULT_EXTENSION}"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
