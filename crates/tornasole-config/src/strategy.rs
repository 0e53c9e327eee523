use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cluster::is_parameter_server_strategy;

/// How training is distributed across processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStrategy {
  #[default]
  None,
  Horovod,
  MirroredStrategy,
  ParameterServerStrategy,
}

impl DistributionStrategy {
  /// Detect the strategy from a cluster configuration, if any.
  ///
  /// Only the parameter-server layout is visible in `TF_CONFIG`; Horovod and
  /// mirrored training have to be selected explicitly.
  pub fn detect(tf_config: Option<&str>) -> Self {
    match tf_config {
      Some(raw) if is_parameter_server_strategy(raw) => Self::ParameterServerStrategy,
      _ => Self::None,
    }
  }
}

impl fmt::Display for DistributionStrategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::None => "none",
      Self::Horovod => "horovod",
      Self::MirroredStrategy => "mirrored_strategy",
      Self::ParameterServerStrategy => "parameter_server_strategy",
    };
    f.write_str(name)
  }
}
