use std::path::PathBuf;

use thiserror::Error;
use tornasole_config::ConfigError;

/// Errors raised while constructing a hook.
#[derive(Debug, Error)]
pub enum HookError {
  /// No output directory was given outside a managed environment.
  #[error("out_dir is a required argument when running outside of SageMaker environments")]
  MissingOutDir,

  /// The output location already holds data from another run.
  #[error(
    "the path {path} already exists on {location}, provide an out_dir that does not already exist"
  )]
  OutDirExists {
    path: String,
    location: &'static str,
  },

  #[error(transparent)]
  Cluster(#[from] ConfigError),

  #[error("failed to parse hook config file {path}")]
  ConfigFile {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// Listing a remote object store failed.
  #[error("remote storage error: {message}")]
  Remote { message: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl HookError {
  pub fn remote(message: impl Into<String>) -> Self {
    Self::Remote {
      message: message.into(),
    }
  }
}
