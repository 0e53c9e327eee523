//! Tornasole Graph
//!
//! Read-only helpers over a static computation graph:
//!
//! - [`GraphDef`] / [`NodeDef`]: the serialized graph, loadable from the JSON
//!   form of a TensorFlow `GraphDef`.
//! - [`node_name`]: strips control-dependency markers (`^a`) and output-slot
//!   suffixes (`a:1`) from input references.
//! - [`GraphSummary`]: a flat index of inputs, nodes and declaration order,
//!   built in a single pass. No topological sort or cycle detection.
//! - [`Fetch`] / [`original_fetch_ops`]: flattens nested fetches into the
//!   operations that produce them.

mod error;
mod fetch;
mod graph_def;
mod name;
mod summary;

pub use error::GraphError;
pub use fetch::{Fetch, Operation, Tensor, Variable, original_fetch_ops};
pub use graph_def::{GraphDef, NodeDef};
pub use name::{CONTROL_DEPENDENCY_PREFIX, node_name, parse_tensor_name};
pub use summary::GraphSummary;
