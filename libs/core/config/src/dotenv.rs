//! Environment-file loading.
//!
//! Values already present in the process environment always win; the file
//! only fills in what is missing.

use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Outcome of [`load_env_file`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvFile {
    /// The file was found and its variables were applied
    Loaded(PathBuf),
    /// No `.env` was found; the ambient environment is used as-is
    NotFound,
}

/// Load key/value pairs from an environment file into the process environment.
///
/// Runs before tracing is initialized, so it does not log; callers report
/// the returned [`EnvFile`] once a subscriber is installed.
///
/// - `Some(path)`: the file must exist and parse, otherwise an error is returned.
/// - `None`: `.env` is searched for from the current directory upwards and
///   loaded if present. A missing file is not an error.
///
/// # Example
/// ```ignore
/// use core_config::dotenv::load_env_file;
///
/// load_env_file(None)?;
/// ```
pub fn load_env_file(path: Option<&Path>) -> Result<EnvFile, ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;
            Ok(EnvFile::Loaded(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(EnvFile::Loaded(found)),
            Err(e) if e.not_found() => Ok(EnvFile::NotFound),
            Err(e) => Err(ConfigError::EnvFile {
                path: PathBuf::from(".env"),
                details: e.to_string(),
            }),
        },
    }
}
