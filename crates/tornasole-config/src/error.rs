use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid cluster config: {0}")]
  InvalidJson(#[from] serde_json::Error),

  #[error("cluster config is missing required field: {0}")]
  MissingField(&'static str),

  #[error("unknown cluster role: {0}")]
  UnknownRole(String),
}
