use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A task role within a training cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Role {
  /// Coordinates the job (checkpoints, summaries) and also trains.
  Chief,
  Worker,
  /// Parameter server.
  ParameterServer,
  /// Evaluates the model. Not part of the training cluster.
  Evaluator,
}

impl Role {
  pub const ALL: [Role; 4] = [
    Role::Chief,
    Role::Worker,
    Role::ParameterServer,
    Role::Evaluator,
  ];

  /// Name used for this role in `TF_CONFIG`.
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Chief => "chief",
      Role::Worker => "worker",
      Role::ParameterServer => "ps",
      Role::Evaluator => "evaluator",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Role::ALL
      .into_iter()
      .find(|role| role.as_str() == s)
      .ok_or_else(|| ConfigError::UnknownRole(s.to_string()))
  }
}

impl TryFrom<String> for Role {
  type Error = ConfigError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Role> for &'static str {
  fn from(role: Role) -> Self {
    role.as_str()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_known_roles() {
    assert_eq!("chief".parse::<Role>().unwrap(), Role::Chief);
    assert_eq!("worker".parse::<Role>().unwrap(), Role::Worker);
    assert_eq!("ps".parse::<Role>().unwrap(), Role::ParameterServer);
    assert_eq!("evaluator".parse::<Role>().unwrap(), Role::Evaluator);
  }

  #[test]
  fn test_parse_unknown_role() {
    let err = "master".parse::<Role>().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownRole(ref r) if r == "master"));
  }

  #[test]
  fn test_serde_uses_tf_config_names() {
    let json = serde_json::to_string(&Role::ParameterServer).unwrap();
    assert_eq!(json, "\"ps\"");

    let role: Role = serde_json::from_str("\"evaluator\"").unwrap();
    assert_eq!(role, Role::Evaluator);
    assert!(serde_json::from_str::<Role>("\"PS\"").is_err());
  }
}
