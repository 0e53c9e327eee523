/// Marks an input as a control dependency, e.g. `^init`.
pub const CONTROL_DEPENDENCY_PREFIX: char = '^';

/// Name of the node an input reference points at.
///
/// `^a` becomes `a`, `a:1` becomes `a`, and `a` is returned unchanged.
pub fn node_name(input: &str) -> &str {
  match input.strip_prefix(CONTROL_DEPENDENCY_PREFIX) {
    Some(name) => name,
    None => input.split_once(':').map_or(input, |(name, _)| name),
  }
}

/// Split a tensor name into its producing node and output index.
///
/// A bare node name refers to output 0. Returns `None` when the suffix after
/// `:` is not an integer.
pub fn parse_tensor_name(tensor: &str) -> Option<(&str, u32)> {
  match tensor.split_once(':') {
    Some((name, index)) => index.parse().ok().map(|i| (name, i)),
    None => Some((tensor, 0)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_node_name_plain() {
    assert_eq!(node_name("dense/MatMul"), "dense/MatMul");
  }

  #[test]
  fn test_node_name_strips_control_prefix() {
    assert_eq!(node_name("^init"), "init");
  }

  #[test]
  fn test_node_name_strips_output_slot() {
    assert_eq!(node_name("split:0"), "split");
    assert_eq!(node_name("split:2"), "split");
  }

  #[test]
  fn test_parse_tensor_name() {
    assert_eq!(parse_tensor_name("a:3"), Some(("a", 3)));
    assert_eq!(parse_tensor_name("a"), Some(("a", 0)));
    assert_eq!(parse_tensor_name("a:x"), None);
  }
}
