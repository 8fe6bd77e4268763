//! Writes exports to disk

use crate::exporter::Export;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while saving an export
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("{path} already exists (use --force or set overwrite = true)", path = .0.display())]
    AlreadyExists(PathBuf),

    #[error("'{0}' is not a plain file name")]
    InvalidFileName(String),

    #[error("Failed to create output directory {path}", path = .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}", path = .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Save an export into a directory
///
/// # Parameters
/// * `export` - File name and payload produced by the exporter
/// * `output_dir` - Directory to write into; created if missing
/// * `overwrite` - Replace an existing file of the same name
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - Name is not a single path component, file exists
///   and `overwrite` is off, or IO failed
pub fn save_export(
    export: &Export,
    output_dir: &Path,
    overwrite: bool,
) -> Result<PathBuf, OutputError> {
    check_file_name(&export.file_name)?;

    if !output_dir.exists() {
        fs::create_dir_all(output_dir).map_err(|source| OutputError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;
    }

    let path = output_dir.join(&export.file_name);
    if path.exists() && !overwrite {
        return Err(OutputError::AlreadyExists(path));
    }

    fs::write(&path, &export.payload).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;

    log::info!("wrote {} bytes to {}", export.payload.len(), path.display());
    Ok(path)
}

/// The file name must stay inside the output directory
fn check_file_name(file_name: &str) -> Result<(), OutputError> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(OutputError::InvalidFileName(file_name.to_string())),
    }
}
