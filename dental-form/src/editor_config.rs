//! Editor configuration from dental-form.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "dental-form.toml";

/// Editor configuration from dental-form.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Directory exported JSON files are written to
    pub output_dir: PathBuf,

    /// Replace an existing file with the same name instead of refusing
    pub overwrite: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            overwrite: false,
        }
    }
}

impl EditorConfig {
    /// Load configuration from a dental-form.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(EditorConfig)` - Successfully loaded configuration
    /// * `Err(EditorConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EditorConfigError> {
        let content = fs::read_to_string(&path).map_err(EditorConfigError::IoError)?;

        let config: EditorConfig =
            toml::from_str(&content).map_err(EditorConfigError::ParseError)?;

        log::debug!("loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must exist. Without one, `dental-form.toml` in the
    /// working directory is used if present, otherwise the defaults.
    ///
    /// # Parameters
    /// * `explicit` - Path given with `--config`, if any
    ///
    /// # Returns
    /// * `Ok(EditorConfig)` - Loaded or default configuration
    /// * `Err(EditorConfigError)` - Explicit file missing, or a file failed to parse
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, EditorConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a dental-form.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the configuration file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(EditorConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EditorConfigError> {
        let content = toml::to_string_pretty(self).map_err(EditorConfigError::SerializeError)?;

        fs::write(&path, content).map_err(EditorConfigError::IoError)?;

        Ok(())
    }
}

/// Errors that can occur when loading or saving editor configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum EditorConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for EditorConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorConfigError::IoError(e) => write!(f, "IO error: {}", e),
            EditorConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            EditorConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for EditorConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_config_roundtrip() {
        let config = EditorConfig {
            output_dir: PathBuf::from("public/data"),
            overwrite: true,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: EditorConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: EditorConfig = toml::from_str("overwrite = true\n").unwrap();

        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.overwrite);

        let empty: EditorConfig = toml::from_str("").unwrap();
        assert_eq!(empty, EditorConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<EditorConfig, _> = toml::from_str("output = \"out\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let config = EditorConfig {
            output_dir: PathBuf::from("exports"),
            overwrite: false,
        };

        config.save(&path).unwrap();
        let loaded = EditorConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EditorConfig::resolve(Some(dir.path().join("nope.toml").as_path()));

        assert!(matches!(result, Err(EditorConfigError::IoError(_))));
    }
}
