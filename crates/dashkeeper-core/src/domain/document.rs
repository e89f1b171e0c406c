//! Configuration document type.
//!
//! Every configuration file decodes to a [`Document`]: an associative value
//! with string keys and arbitrary nested content. YAML's mapping type keeps
//! insertion order, which is what lets a decode → edit → encode cycle leave
//! untouched keys where the user wrote them.

use serde_yaml::{Mapping, Value};

/// A decoded configuration document.
///
/// Almost always a mapping at the top level; scalars and sequences pass
/// through the codec untouched so hand-written files are never mangled.
pub type Document = Value;

/// Returns the empty document: a mapping with no keys.
///
/// Missing and empty configuration files both read as this value.
pub fn empty_document() -> Document {
    Value::Mapping(Mapping::new())
}

/// Returns `true` for documents with no content (`null` or an empty mapping).
pub fn is_empty_document(doc: &Document) -> bool {
    match doc {
        Value::Null => true,
        Value::Mapping(map) => map.is_empty(),
        _ => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
