use std::collections::HashMap;

use serde_json::Value;

use crate::error::GraphError;
use crate::fetch::{Fetch, Operation, Tensor, Variable};
use crate::graph_def::{GraphDef, NodeDef};
use crate::name::{node_name, parse_tensor_name};

/// Ops whose first output is a variable's value.
const VARIABLE_OPS: [&str; 3] = ["VariableV2", "Variable", "VarHandleOp"];

/// Flat index over a [`GraphDef`], borrowed from it.
#[derive(Debug, Clone, Default)]
pub struct GraphSummary<'a> {
  /// Normalized input names, keyed by the consuming node.
  pub name_to_input_name: HashMap<&'a str, Vec<&'a str>>,
  pub name_to_node: HashMap<&'a str, &'a NodeDef>,
  /// Position of each node in the graph definition.
  pub name_to_seq_num: HashMap<&'a str, usize>,
}

impl<'a> GraphSummary<'a> {
  /// Index the graph in one pass over its nodes.
  ///
  /// If a name appears twice the later node wins, including its sequence number.
  pub fn extract(graph_def: &'a GraphDef) -> Self {
    let mut summary = Self::default();

    for (seq, node) in graph_def.node.iter().enumerate() {
      let name = node_name(&node.name);
      summary.name_to_node.insert(name, node);
      summary
        .name_to_input_name
        .insert(name, node.input.iter().map(|i| node_name(i)).collect());
      summary.name_to_seq_num.insert(name, seq);
    }

    summary
  }

  pub fn len(&self) -> usize {
    self.name_to_node.len()
  }

  pub fn is_empty(&self) -> bool {
    self.name_to_node.is_empty()
  }

  pub fn node(&self, name: &str) -> Option<&'a NodeDef> {
    self.name_to_node.get(name).copied()
  }

  /// Normalized inputs of a node, empty if the node is unknown.
  pub fn inputs(&self, name: &str) -> &[&'a str] {
    self
      .name_to_input_name
      .get(name)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Node names in declaration order.
  pub fn nodes_in_order(&self) -> Vec<&'a str> {
    let mut names: Vec<(&'a str, usize)> = self
      .name_to_seq_num
      .iter()
      .map(|(name, seq)| (*name, *seq))
      .collect();
    names.sort_by_key(|(_, seq)| *seq);
    names.into_iter().map(|(name, _)| name).collect()
  }

  /// Build a [`Fetch`] from its JSON description against this graph.
  ///
  /// Strings name operations (`"train_op"`) or tensors (`"logits:0"`); a
  /// tensor produced by a variable op becomes a [`Variable`]. Arrays become
  /// lists and objects become maps, in document order. Any other value is
  /// kept as [`Fetch::Value`] and rejected later by [`crate::original_fetch_ops`].
  pub fn resolve_fetch(&self, value: &Value) -> Result<Fetch, GraphError> {
    match value {
      Value::String(name) => self.resolve_name(name),
      Value::Array(items) => items
        .iter()
        .map(|item| self.resolve_fetch(item))
        .collect::<Result<Vec<_>, _>>()
        .map(Fetch::List),
      Value::Object(entries) => entries
        .iter()
        .map(|(key, item)| Ok((key.clone(), self.resolve_fetch(item)?)))
        .collect::<Result<Vec<_>, GraphError>>()
        .map(Fetch::Map),
      other => Ok(Fetch::Value(other.clone())),
    }
  }

  fn resolve_name(&self, name: &str) -> Result<Fetch, GraphError> {
    if !name.contains(':') {
      let node = self
        .node(name)
        .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))?;
      return Ok(Fetch::Operation(Operation::new(&node.name)));
    }

    let (op_name, index) =
      parse_tensor_name(name).ok_or_else(|| GraphError::NodeNotFound(name.to_string()))?;
    let node = self
      .node(op_name)
      .ok_or_else(|| GraphError::NodeNotFound(op_name.to_string()))?;

    if index == 0 && VARIABLE_OPS.contains(&node.op.as_str()) {
      Ok(Fetch::Variable(Variable::new(Operation::new(op_name))))
    } else {
      Ok(Fetch::Tensor(Tensor::new(Operation::new(op_name), index)))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn abc_graph() -> GraphDef {
    GraphDef::new(vec![
      NodeDef::new("A", "Const"),
      NodeDef::new("B", "NoOp").with_input("^A"),
      NodeDef::new("C", "Identity").with_input("A:0"),
    ])
  }

  #[test]
  fn test_extract_inputs_and_order() {
    let graph = abc_graph();
    let summary = GraphSummary::extract(&graph);

    assert_eq!(summary.inputs("A"), &[] as &[&str]);
    assert_eq!(summary.inputs("B"), ["A"]);
    assert_eq!(summary.inputs("C"), ["A"]);

    assert_eq!(summary.name_to_seq_num["A"], 0);
    assert_eq!(summary.name_to_seq_num["B"], 1);
    assert_eq!(summary.name_to_seq_num["C"], 2);
    assert_eq!(summary.nodes_in_order(), vec!["A", "B", "C"]);
  }

  #[test]
  fn test_extract_indexes_nodes() {
    let graph = abc_graph();
    let summary = GraphSummary::extract(&graph);

    assert_eq!(summary.len(), 3);
    assert_eq!(summary.node("C").map(|n| n.op.as_str()), Some("Identity"));
    assert!(summary.node("D").is_none());
  }

  #[test]
  fn test_extract_keeps_duplicate_inputs() {
    let graph = GraphDef::new(vec![
      NodeDef::new("x", "Placeholder"),
      NodeDef::new("add", "Add").with_input("x").with_input("x:0").with_input("^x"),
    ]);
    let summary = GraphSummary::extract(&graph);
    assert_eq!(summary.inputs("add"), ["x", "x", "x"]);
  }

  #[test]
  fn test_extract_does_not_require_defined_inputs() {
    let graph = GraphDef::new(vec![NodeDef::new("b", "Identity").with_input("a:0")]);
    let summary = GraphSummary::extract(&graph);
    assert_eq!(summary.inputs("b"), ["a"]);
    assert!(summary.node("a").is_none());
  }

  #[test]
  fn test_extract_empty_graph() {
    let graph = GraphDef::default();
    let summary = GraphSummary::extract(&graph);
    assert!(summary.is_empty());
    assert!(summary.nodes_in_order().is_empty());
  }

  #[test]
  fn test_duplicate_name_later_wins() {
    let graph = GraphDef::new(vec![
      NodeDef::new("a", "Const"),
      NodeDef::new("b", "Const"),
      NodeDef::new("a", "Identity").with_input("b"),
    ]);
    let summary = GraphSummary::extract(&graph);
    assert_eq!(summary.len(), 2);
    assert_eq!(summary.name_to_seq_num["a"], 2);
    assert_eq!(summary.inputs("a"), ["b"]);
  }
}
