use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::HookError;

/// Points at an optional JSON hook configuration file.
pub const CONFIG_FILE_PATH_ENV: &str = "TORNASOLE_CONFIG_FILE_PATH";

/// Hook settings read from a JSON file.
///
/// ```json
/// { "LocalPath": "/tmp/tornasole/run-1" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
  /// Output directory, used when the caller does not pass one.
  #[serde(rename = "LocalPath", default, skip_serializing_if = "Option::is_none")]
  pub out_dir: Option<String>,
}

impl HookConfig {
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, HookError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| HookError::ConfigFile {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Load the file named by `TORNASOLE_CONFIG_FILE_PATH`, if set.
  pub fn from_env() -> Result<Option<Self>, HookError> {
    match std::env::var_os(CONFIG_FILE_PATH_ENV) {
      Some(path) => Self::from_json_file(PathBuf::from(path)).map(Some),
      None => Ok(None),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn test_load_local_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"LocalPath": "/tmp/run"}}"#).unwrap();

    let config = HookConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.out_dir.as_deref(), Some("/tmp/run"));
  }

  #[test]
  fn test_empty_object_is_default() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{}}").unwrap();

    assert_eq!(HookConfig::from_json_file(file.path()).unwrap(), HookConfig::default());
  }

  #[test]
  fn test_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "LocalPath=/tmp").unwrap();

    let err = HookConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, HookError::ConfigFile { .. }));
  }
}
