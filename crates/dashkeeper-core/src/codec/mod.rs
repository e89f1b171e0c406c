//! Configuration document codec.
//!
//! Dashkeeper stores documents in human-editable text formats: YAML is the
//! primary format, JSON the secondary. The format is chosen by the target
//! file's extension:
//!
//! | Extension        | Decode                 | Encode                |
//! |------------------|------------------------|-----------------------|
//! | `.yaml` / `.yml` | YAML only              | YAML                  |
//! | `.json`          | JSON only              | pretty JSON           |
//! | anything else    | YAML, then JSON        | YAML                  |
//!
//! Two rules matter more than the table:
//!
//! - Empty or whitespace-only content decodes to the empty document, never
//!   an error. Users truncate files by hand; that must not brick a read.
//! - Content that EXISTS but parses in neither format is a hard
//!   [`CodecError`]. Silently turning a corrupt file into an empty document
//!   would destroy it on the next write.

use std::path::Path;

use thiserror::Error;

use crate::domain::document::{empty_document, Document};

/// Errors produced while decoding or encoding a document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Content under a YAML extension (or the YAML half of encoding) failed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Content under a JSON extension (or the JSON half of encoding) failed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Sniffing fallback: the content parsed as neither YAML nor JSON.
    /// Carries both parser messages since either may be the useful one.
    #[error("content is neither valid YAML nor valid JSON (yaml: {yaml}; json: {json})")]
    Unrecognized {
        yaml: serde_yaml::Error,
        json: serde_json::Error,
    },
}

/// Text format selected from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Yaml,
    Json,
}

impl ContentFormat {
    /// Maps an extension to a format; `None` means ambiguous (sniff on
    /// decode, YAML on encode).
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Some(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }
}

/// Selects the format for `path` from its extension, if it has a known one.
pub fn format_for_path(path: &Path) -> Option<ContentFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ContentFormat::from_extension)
}

/// Decodes `content` into a [`Document`].
///
/// `format` is the extension-derived format; `None` engages the two-stage
/// sniff (YAML first, JSON second). A YAML `null` body — which is what an
/// empty file parses to — normalizes to the empty document. Takes bytes
/// rather than a string so that non-UTF-8 content reaches the parsers and
/// comes back as a parse error, never as a silent empty document.
///
/// # Errors
///
/// Returns [`CodecError::Yaml`] / [`CodecError::Json`] when a known format
/// rejects the content, or [`CodecError::Unrecognized`] when sniffing
/// exhausts both parsers.
pub fn decode(content: &[u8], format: Option<ContentFormat>) -> Result<Document, CodecError> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty_document());
    }

    let document = match format {
        Some(ContentFormat::Yaml) => serde_yaml::from_slice(content)?,
        Some(ContentFormat::Json) => serde_json::from_slice(content)?,
        None => match serde_yaml::from_slice(content) {
            Ok(doc) => doc,
            Err(yaml) => match serde_json::from_slice(content) {
                Ok(doc) => doc,
                Err(json) => return Err(CodecError::Unrecognized { yaml, json }),
            },
        },
    };

    Ok(normalize(document))
}

/// Encodes a [`Document`] for a target with the given format.
///
/// YAML output keeps mapping keys in insertion order; JSON output is
/// pretty-printed with two-space indentation. Ambiguous extensions encode
/// as YAML, the primary format.
///
/// # Errors
///
/// Returns a [`CodecError`] when the document cannot be represented in the
/// chosen format (e.g. a non-string mapping key under JSON).
pub fn encode(document: &Document, format: Option<ContentFormat>) -> Result<String, CodecError> {
    match format {
        Some(ContentFormat::Json) => Ok(serde_json::to_string_pretty(document)?),
        Some(ContentFormat::Yaml) | None => Ok(serde_yaml::to_string(document)?),
    }
}

/// An empty file parses to YAML `null`; readers expect a mapping.
fn normalize(document: Document) -> Document {
    if document.is_null() {
        empty_document()
    } else {
        document
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
