//! Domain entities for Dashkeeper configuration management.
//!
//! This module contains pure data types with no filesystem dependencies:
//! the descriptor registry, the document type every configuration decodes
//! to, and the backup filename scheme. Everything here can be tested
//! without touching disk.

pub mod backup_record;
pub mod descriptor;
pub mod document;

pub use backup_record::{backup_file_name, parse_backup_file_name, BackupRecord};
pub use descriptor::{builtin_registry, ConfigDescriptor, DEFAULT_EXTENSION, DEFAULT_MODE};
pub use document::{empty_document, is_empty_document, Document};
