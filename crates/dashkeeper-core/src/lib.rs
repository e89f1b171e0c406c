//! # dashkeeper-core
//!
//! Configuration management for the Dashkeeper dashboard editor: named
//! configuration files, path resolution, access validation, privilege
//! elevation, timestamped backups, and YAML/JSON encoding.
//!
//! # Architecture overview
//!
//! The editor never touches configuration files directly. It holds one
//! [`ConfigManager`] and asks it to read, write, relocate, validate, and
//! restore configurations by NAME ("bookmarks", "settings", ...). The
//! manager sequences five collaborators:
//!
//! - **`domain`** – pure data: the descriptor registry, the document type,
//!   and the backup filename scheme.
//! - **`codec`** – YAML (primary) and JSON (secondary) encoding, chosen by
//!   file extension with a sniffing fallback for unknown extensions.
//! - **`storage`** – the persistent name → path manifest and the backup
//!   store, both writing through temp-file-plus-rename.
//! - **`access`** – non-mutating permission checks and the probe-file
//!   validation used before a path may be reassigned.
//! - **`elevate`** – the privilege helper behind a trait, so tests script
//!   elevation instead of spawning `sudo`.
//!
//! Everything is synchronous; callers that want background sweeps put the
//! manager behind their own threads (it is `Send + Sync`).

pub mod access;
pub mod codec;
pub mod domain;
pub mod elevate;
pub mod manager;
pub mod paths;
pub mod storage;

// Re-export the types most callers need so they can write
// `dashkeeper_core::ConfigManager` instead of the full module path.
pub use access::{check_access, validate_path, AccessResult, PathValidationError};
pub use codec::{decode, encode, format_for_path, CodecError, ContentFormat};
pub use domain::backup_record::BackupRecord;
pub use domain::descriptor::{builtin_registry, ConfigDescriptor, DEFAULT_EXTENSION, DEFAULT_MODE};
pub use domain::document::{empty_document, is_empty_document, Document};
pub use elevate::{platform_elevator, ElevateError, Elevator, MockElevator, UnsupportedElevator};
pub use manager::{ConfigError, ConfigManager, ConfigStatus, ValidationReport};
pub use paths::AppPaths;
pub use storage::{BackupError, BackupStore, ManifestError, PathManifest};
