use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// One node of a serialized graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
  pub name: String,
  #[serde(default)]
  pub op: String,
  /// Input references, in order. Control dependencies are prefixed with `^`,
  /// data inputs may carry an output slot (`node:1`).
  #[serde(default)]
  pub input: Vec<String>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub device: String,
  /// Attribute payload, kept opaque.
  #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
  pub attr: serde_json::Map<String, serde_json::Value>,
}

impl NodeDef {
  pub fn new(name: impl Into<String>, op: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      op: op.into(),
      input: Vec::new(),
      device: String::new(),
      attr: serde_json::Map::new(),
    }
  }

  pub fn with_input(mut self, input: impl Into<String>) -> Self {
    self.input.push(input.into());
    self
  }
}

/// An ordered sequence of nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDef {
  #[serde(default)]
  pub node: Vec<NodeDef>,
}

impl GraphDef {
  pub fn new(node: Vec<NodeDef>) -> Self {
    Self { node }
  }

  pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
    let content = std::fs::read_to_string(path)?;
    Self::from_json_str(&content)
  }
}
