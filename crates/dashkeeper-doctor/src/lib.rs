//! dashkeeper-doctor library entry point.
//!
//! Re-exports the report module so that unit tests and the binary entry
//! point in `main.rs` share the same module tree.

pub mod report;
