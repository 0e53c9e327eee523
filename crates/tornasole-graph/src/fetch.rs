use std::fmt;

use serde_json::Value;

use crate::error::GraphError;

/// Handle to an executable graph operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
  name: String,
}

impl Operation {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)
  }
}

/// Handle to one output of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tensor {
  op: Operation,
  value_index: u32,
}

impl Tensor {
  pub fn new(op: Operation, value_index: u32) -> Self {
    Self { op, value_index }
  }

  /// The operation producing this tensor.
  pub fn op(&self) -> &Operation {
    &self.op
  }

  pub fn value_index(&self) -> u32 {
    self.value_index
  }
}

/// Handle to a variable, whose value is output 0 of its op.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
  op: Operation,
}

impl Variable {
  pub fn new(op: Operation) -> Self {
    Self { op }
  }

  pub fn op(&self) -> &Operation {
    &self.op
  }
}

/// Something handed to a session to run, possibly nested.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
  Tensor(Tensor),
  Variable(Variable),
  Operation(Operation),
  List(Vec<Fetch>),
  /// Keyed fetches, traversed in insertion order.
  Map(Vec<(String, Fetch)>),
  /// A plain value that is not a graph handle.
  Value(Value),
}

impl From<Tensor> for Fetch {
  fn from(tensor: Tensor) -> Self {
    Fetch::Tensor(tensor)
  }
}

impl From<Variable> for Fetch {
  fn from(variable: Variable) -> Self {
    Fetch::Variable(variable)
  }
}

impl From<Operation> for Fetch {
  fn from(op: Operation) -> Self {
    Fetch::Operation(op)
  }
}

impl From<Vec<Fetch>> for Fetch {
  fn from(list: Vec<Fetch>) -> Self {
    Fetch::List(list)
  }
}

impl From<Value> for Fetch {
  fn from(value: Value) -> Self {
    Fetch::Value(value)
  }
}

/// Flatten fetches into the operations that produce them, in traversal order.
///
/// Tensors and variables contribute their op. Lists are walked in order and
/// maps in insertion order. A [`Fetch::Value`] anywhere is an error.
pub fn original_fetch_ops(fetches: &Fetch) -> Result<Vec<Operation>, GraphError> {
  let mut ops = Vec::new();
  collect_ops(fetches, &mut ops)?;
  Ok(ops)
}

fn collect_ops(fetch: &Fetch, ops: &mut Vec<Operation>) -> Result<(), GraphError> {
  match fetch {
    Fetch::Tensor(tensor) => ops.push(tensor.op().clone()),
    Fetch::Variable(variable) => ops.push(variable.op().clone()),
    Fetch::Operation(op) => ops.push(op.clone()),
    Fetch::List(items) => {
      for item in items {
        collect_ops(item, ops)?;
      }
    }
    Fetch::Map(entries) => {
      for (_, item) in entries {
        collect_ops(item, ops)?;
      }
    }
    Fetch::Value(value) => {
      return Err(GraphError::InvalidFetch {
        kind: json_kind(value),
        value: value.to_string(),
      });
    }
  }
  Ok(())
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tensor(op: &str) -> Fetch {
    Tensor::new(Operation::new(op), 0).into()
  }

  #[test]
  fn test_single_tensor_yields_its_op() {
    let ops = original_fetch_ops(&tensor("logits")).unwrap();
    assert_eq!(ops, vec![Operation::new("logits")]);
  }

  #[test]
  fn test_single_operation() {
    let ops = original_fetch_ops(&Operation::new("train_op").into()).unwrap();
    assert_eq!(ops, vec![Operation::new("train_op")]);
  }

  #[test]
  fn test_variable_yields_its_op() {
    let fetch: Fetch = Variable::new(Operation::new("w")).into();
    assert_eq!(original_fetch_ops(&fetch).unwrap(), vec![Operation::new("w")]);
  }

  #[test]
  fn test_nested_fetches_keep_traversal_order() {
    let fetches = Fetch::Map(vec![
      (
        "x".to_string(),
        Fetch::List(vec![
          tensor("t1"),
          Fetch::List(vec![tensor("t2"), Operation::new("op1").into()]),
        ]),
      ),
      ("y".to_string(), tensor("t3")),
    ]);

    let names: Vec<String> = original_fetch_ops(&fetches)
      .unwrap()
      .into_iter()
      .map(|op| op.name().to_string())
      .collect();
    assert_eq!(names, vec!["t1", "t2", "op1", "t3"]);
  }

  #[test]
  fn test_empty_list() {
    assert!(original_fetch_ops(&Fetch::List(vec![])).unwrap().is_empty());
  }

  #[test]
  fn test_bare_integer_is_rejected() {
    let err = original_fetch_ops(&Fetch::Value(serde_json::json!(7))).unwrap_err();
    assert!(matches!(err, GraphError::InvalidFetch { kind: "number", .. }));
  }

  #[test]
  fn test_invalid_leaf_inside_list_is_rejected() {
    let fetches = Fetch::List(vec![tensor("a"), Fetch::Value(Value::Null)]);
    let err = original_fetch_ops(&fetches).unwrap_err();
    assert_eq!(err.to_string(), "invalid fetch of type null: null");
  }

  #[test]
  fn test_tensor_output_index_does_not_change_its_op() {
    let fetch: Fetch = Tensor::new(Operation::new("split"), 2).into();
    assert_eq!(original_fetch_ops(&fetch).unwrap(), vec![Operation::new("split")]);
  }
}
