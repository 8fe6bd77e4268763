//! JSON exporter for edited documents
//!
//! Turns the live editing state into the exported artifact:
//! - Raw bullet text of each section becomes a list of trimmed strings
//! - The file name field becomes a slug with a `.json` extension
//! - The normalized snapshot is written as pretty-printed JSON

use crate::document::Document;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// Extension appended to every exported file name
pub const EXPORT_EXTENSION: &str = ".json";

/// File name used when the file name field is blank
pub const DEFAULT_FILE_NAME: &str = "dental-data.json";

/// Glyph users paste in from word processors; treated like a comma
const BULLET_GLYPH: char = '•';

const SEPARATOR: char = ',';

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Errors that can occur while serializing or re-reading an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Not a valid dental data document: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Normalized, export-ready copy of a document
///
/// Has exactly the shape of [`Document`]; every section's bullet points have
/// been derived from its raw bullet text. Neither the raw text nor the file
/// name is part of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Document);

impl Snapshot {
    /// Borrow the normalized document
    pub fn document(&self) -> &Document {
        &self.0
    }

    /// Take ownership of the normalized document
    pub fn into_document(self) -> Document {
        self.0
    }
}

/// The two values handed to whatever saves the export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Name of the artifact, see [`derive_file_name`]
    pub file_name: String,
    /// Serialized snapshot, see [`serialize`]
    pub payload: String,
}

/// Split raw bullet text into bullet points
///
/// Bullet glyphs and commas both separate items. Items are trimmed and empty
/// items are dropped, so stray separators and blank lines vanish.
///
/// # Parameters
/// * `raw` - Text as typed into the bullet points field
///
/// # Returns
/// * `Vec<String>` - Bullet points in input order, possibly empty
pub fn parse_bullet_points(raw: &str) -> Vec<String> {
    raw.replace(BULLET_GLYPH, ",")
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the export snapshot of a document
///
/// # Parameters
/// * `document` - Current document; its stored bullet points are ignored
/// * `raw_bullets` - Raw bullet text per section, index-aligned with `document.sections`
///
/// # Returns
/// * `Snapshot` - Copy of `document` with every section's bullet points replaced
///   by the parsed raw text (a missing entry counts as empty text)
pub fn build_snapshot(document: &Document, raw_bullets: &[String]) -> Snapshot {
    let mut normalized = document.clone();

    for (index, section) in normalized.sections.iter_mut().enumerate() {
        let raw = raw_bullets.get(index).map(String::as_str).unwrap_or_default();
        section.description.bullet_points = parse_bullet_points(raw);
    }

    Snapshot(normalized)
}

/// Derive the artifact file name from the file name field
///
/// # Parameters
/// * `file_name` - File name field as typed by the user
///
/// # Returns
/// * `String` - Lowercased, trimmed name with whitespace runs turned into `-`,
///   plus `.json`; [`DEFAULT_FILE_NAME`] when the field is blank
pub fn derive_file_name(file_name: &str) -> String {
    let trimmed = file_name.trim();
    if trimmed.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }

    let slug = WHITESPACE_RUN.replace_all(trimmed, "-").to_lowercase();
    format!("{}{}", slug, EXPORT_EXTENSION)
}

/// Serialize a snapshot as pretty-printed JSON
///
/// Keys follow the field declaration order of [`Document`] and nesting is
/// indented by two spaces.
///
/// # Returns
/// * `Ok(String)` - JSON text
/// * `Err(ExportError)` - Serialization failed
pub fn serialize(snapshot: &Snapshot) -> Result<String, ExportError> {
    serde_json::to_string_pretty(snapshot).map_err(ExportError::Serialize)
}

/// Parse exported JSON back into a snapshot
///
/// Only the structural shape is checked: every key must be present, no
/// unknown keys are allowed and value types must match.
///
/// # Returns
/// * `Ok(Snapshot)` - Text had the shape of a document
/// * `Err(ExportError)` - Invalid JSON or wrong shape
pub fn parse(text: &str) -> Result<Snapshot, ExportError> {
    serde_json::from_str(text).map_err(ExportError::Parse)
}
