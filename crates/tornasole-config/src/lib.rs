//! Tornasole Config
//!
//! Cluster configuration types for distributed training jobs. A cluster is
//! described to every process through the `TF_CONFIG` environment variable:
//!
//! ```json
//! {
//!   "cluster": {
//!     "chief": ["host0:2222"],
//!     "worker": ["host1:2222", "host2:2222"],
//!     "ps": ["host3:2222"]
//!   },
//!   "task": {"type": "worker", "index": 0}
//! }
//! ```
//!
//! Two kinds of queries are offered and they handle bad input differently:
//! - [`is_parameter_server_strategy`] is a probe. It returns `false` for
//!   anything it cannot make sense of.
//! - [`get_worker_id_from_tf_config`] and [`get_num_workers_from_tf_config`]
//!   are lookups that assume cluster mode is established, and fail with a
//!   [`ConfigError`] on malformed input.

mod cluster;
mod error;
mod role;
mod strategy;

pub use cluster::{
  ClusterConfig, ClusterSpec, TF_CONFIG_ENV, TaskSpec, get_num_workers_from_tf_config,
  get_worker_id_from_tf_config, is_parameter_server_strategy,
};
pub use error::ConfigError;
pub use role::Role;
pub use strategy::DistributionStrategy;
