use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
  /// A fetch leaf is not a tensor, variable or operation.
  #[error("invalid fetch of type {kind}: {value}")]
  InvalidFetch { kind: &'static str, value: String },

  #[error("node not found in graph: {0}")]
  NodeNotFound(String),

  #[error("failed to parse graph: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
