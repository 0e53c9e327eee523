use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ConfigError;
use crate::role::Role;

/// Environment variable carrying the cluster configuration.
pub const TF_CONFIG_ENV: &str = "TF_CONFIG";

/// Mapping from role name to the ordered addresses of its tasks.
///
/// Keys are kept as raw strings so that roles this crate does not model
/// (e.g. legacy `"master"`) do not make the whole configuration unreadable.
/// Entries that are not lists of addresses are dropped on parse, so a
/// malformed role only affects lookups of that role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
  from = "BTreeMap<String, Value>",
  into = "BTreeMap<String, Vec<String>>"
)]
pub struct ClusterSpec(BTreeMap<String, Vec<String>>);

impl From<BTreeMap<String, Value>> for ClusterSpec {
  fn from(raw: BTreeMap<String, Value>) -> Self {
    let roles = raw
      .into_iter()
      .filter_map(|(role, value)| match serde_json::from_value::<Vec<String>>(value) {
        Ok(addresses) => Some((role, addresses)),
        Err(e) => {
          debug!(role = %role, error = %e, "ignoring malformed cluster entry");
          None
        }
      })
      .collect();
    Self(roles)
  }
}

impl From<ClusterSpec> for BTreeMap<String, Vec<String>> {
  fn from(spec: ClusterSpec) -> Self {
    spec.0
  }
}

impl ClusterSpec {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add the addresses for a role, replacing any previous entry.
  pub fn with_role(mut self, role: Role, addresses: Vec<String>) -> Self {
    self.0.insert(role.as_str().to_string(), addresses);
    self
  }

  /// Whether the role has an entry, regardless of how many addresses it lists.
  pub fn contains(&self, role: Role) -> bool {
    self.0.contains_key(role.as_str())
  }

  /// Addresses for a role, empty when the role is absent.
  pub fn addresses(&self, role: Role) -> &[String] {
    self
      .0
      .get(role.as_str())
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Number of tasks that run training steps: workers plus the chief.
  pub fn num_workers(&self) -> Result<usize, ConfigError> {
    let workers = self
      .0
      .get(Role::Worker.as_str())
      .ok_or(ConfigError::MissingField("cluster.worker"))?;
    Ok(workers.len() + self.addresses(Role::Chief).len())
  }
}

/// The task this process runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskSpec {
  #[serde(rename = "type")]
  pub role: Role,
  pub index: u32,
}

impl TaskSpec {
  pub fn new(role: Role, index: u32) -> Self {
    Self { role, index }
  }

  /// Identifier of the form `{role}_{index}`, e.g. `worker_2`.
  pub fn worker_id(&self) -> String {
    format!("{}_{}", self.role, self.index)
  }
}

/// `task` section as written, before the role is checked.
#[derive(Deserialize)]
struct RawTask {
  #[serde(rename = "type")]
  role: String,
  index: u32,
}

impl TryFrom<RawTask> for TaskSpec {
  type Error = ConfigError;

  fn try_from(raw: RawTask) -> Result<Self, Self::Error> {
    Ok(Self::new(raw.role.parse()?, raw.index))
  }
}

/// Parsed `TF_CONFIG`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cluster: Option<ClusterSpec>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub task: Option<TaskSpec>,
}

impl ClusterConfig {
  /// Parse a cluster configuration string.
  pub fn parse(tf_config: &str) -> Result<Self, ConfigError> {
    #[derive(Deserialize)]
    struct RawConfig {
      cluster: Option<ClusterSpec>,
      task: Option<RawTask>,
    }

    let raw: RawConfig = serde_json::from_str(tf_config)?;
    Ok(Self {
      cluster: raw.cluster,
      task: raw.task.map(TaskSpec::try_from).transpose()?,
    })
  }

  /// Read the configuration from `TF_CONFIG`. Returns `Ok(None)` when unset.
  pub fn from_env() -> Result<Option<Self>, ConfigError> {
    match std::env::var(TF_CONFIG_ENV) {
      Ok(raw) => Self::parse(&raw).map(Some),
      Err(_) => {
        debug!(env = TF_CONFIG_ENV, "cluster config not set");
        Ok(None)
      }
    }
  }

  pub fn cluster(&self) -> Result<&ClusterSpec, ConfigError> {
    self
      .cluster
      .as_ref()
      .ok_or(ConfigError::MissingField("cluster"))
  }

  pub fn task(&self) -> Result<&TaskSpec, ConfigError> {
    self.task.as_ref().ok_or(ConfigError::MissingField("task"))
  }

  /// The task acting as chief.
  ///
  /// When the cluster has no `chief` entry, worker 0 takes the role.
  /// Returns `None` if neither exists.
  pub fn chief(&self) -> Option<TaskSpec> {
    let cluster = self.cluster.as_ref()?;
    [Role::Chief, Role::Worker]
      .into_iter()
      .find(|role| !cluster.addresses(*role).is_empty())
      .map(|role| TaskSpec::new(role, 0))
  }

  /// Whether this process is the chief, explicit or implicit.
  pub fn is_chief(&self) -> bool {
    match (self.task, self.chief()) {
      (Some(task), Some(chief)) => task == chief,
      _ => false,
    }
  }

  /// Addresses of every training task, chief first.
  pub fn worker_addresses(&self) -> Result<Vec<&str>, ConfigError> {
    let cluster = self.cluster()?;
    if !cluster.contains(Role::Worker) {
      return Err(ConfigError::MissingField("cluster.worker"));
    }
    Ok(
      cluster
        .addresses(Role::Chief)
        .iter()
        .chain(cluster.addresses(Role::Worker))
        .map(String::as_str)
        .collect(),
    )
  }
}

/// Probe whether the cluster uses parameter servers.
///
/// True iff the text is JSON with a `cluster` object that has a `ps` entry.
/// An empty `ps` list still counts. Malformed input yields `false`.
pub fn is_parameter_server_strategy(tf_config: &str) -> bool {
  let Ok(value) = serde_json::from_str::<Value>(tf_config) else {
    return false;
  };
  value
    .get("cluster")
    .and_then(Value::as_object)
    .is_some_and(|cluster| cluster.contains_key(Role::ParameterServer.as_str()))
}

/// Worker identifier (`{role}_{index}`) from the `task` section.
pub fn get_worker_id_from_tf_config(tf_config: &str) -> Result<String, ConfigError> {
  #[derive(Deserialize)]
  struct TaskOnly {
    task: Option<RawTask>,
  }

  let parsed: TaskOnly = serde_json::from_str(tf_config)?;
  let task = parsed.task.ok_or(ConfigError::MissingField("task"))?;
  Ok(TaskSpec::try_from(task)?.worker_id())
}

/// Number of workers in the cluster, counting the chief if present.
pub fn get_num_workers_from_tf_config(tf_config: &str) -> Result<usize, ConfigError> {
  #[derive(Deserialize)]
  struct ClusterOnly {
    cluster: Option<ClusterSpec>,
  }

  let parsed: ClusterOnly = serde_json::from_str(tf_config)?;
  parsed
    .cluster
    .ok_or(ConfigError::MissingField("cluster"))?
    .num_workers()
}
