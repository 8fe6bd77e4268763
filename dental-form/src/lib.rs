//! dental-form - structured page description editor
//!
//! Builds a "dental data" page description one field at a time and exports
//! it as a JSON file. The [`document_model::DocumentModel`] owns the editing
//! state, [`exporter`] normalizes and serializes it, and [`command`] maps
//! input lines onto model operations.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod command;
pub mod document;
pub mod document_model;
pub mod editor_config;
pub mod exporter;
pub mod location;
pub mod output;

pub use document::Document;
pub use document_model::DocumentModel;
pub use exporter::{Export, Snapshot};
