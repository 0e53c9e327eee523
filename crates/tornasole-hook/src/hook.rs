use tornasole_config::{
  ClusterConfig, DistributionStrategy, TF_CONFIG_ENV, get_num_workers_from_tf_config,
  get_worker_id_from_tf_config,
};
use tracing::info;

use crate::access::{DirChecker, LocalDirChecker};
use crate::config::HookConfig;
use crate::env::{SageMakerEnvironment, TrainingEnvironment};
use crate::error::HookError;
use crate::out_dir::verify_and_get_out_dir;

/// Worker id of a process that is not part of a parameter-server cluster.
pub const DEFAULT_WORKER_ID: &str = "worker_0";

/// Collaborators a hook is built against.
pub struct HookContext {
  pub env: Box<dyn TrainingEnvironment>,
  pub checker: Box<dyn DirChecker>,
  /// Raw cluster configuration, if any.
  pub tf_config: Option<String>,
  pub config: HookConfig,
}

impl HookContext {
  /// Context for the current process: SageMaker detection, local filesystem
  /// checks, `TF_CONFIG` and the optional hook config file.
  pub fn from_env() -> Result<Self, HookError> {
    Ok(Self {
      env: Box::new(SageMakerEnvironment::from_env()),
      checker: Box::new(LocalDirChecker::new()),
      tf_config: std::env::var(TF_CONFIG_ENV).ok(),
      config: HookConfig::from_env()?.unwrap_or_default(),
    })
  }
}

/// A hook's resolved identity and output location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
  out_dir: String,
  worker_id: String,
  num_workers: usize,
  is_chief: bool,
  distribution_strategy: DistributionStrategy,
}

impl Hook {
  /// Build a hook for the current process.
  pub fn new(out_dir: Option<&str>) -> Result<Self, HookError> {
    Self::with_context(out_dir, &HookContext::from_env()?)
  }

  /// Build a hook against explicit collaborators.
  ///
  /// `out_dir` takes precedence over the config file's `LocalPath`.
  pub fn with_context(out_dir: Option<&str>, ctx: &HookContext) -> Result<Self, HookError> {
    let requested = out_dir.or(ctx.config.out_dir.as_deref());
    let out_dir = verify_and_get_out_dir(requested, ctx.env.as_ref(), ctx.checker.as_ref())?;

    let tf_config = ctx.tf_config.as_deref();
    let distribution_strategy = DistributionStrategy::detect(tf_config);

    let (worker_id, num_workers, is_chief) = match tf_config {
      Some(raw) if distribution_strategy == DistributionStrategy::ParameterServerStrategy => (
        get_worker_id_from_tf_config(raw)?,
        get_num_workers_from_tf_config(raw)?,
        ClusterConfig::parse(raw)?.is_chief(),
      ),
      _ => (DEFAULT_WORKER_ID.to_string(), 1, true),
    };

    let hook = Self {
      out_dir,
      worker_id,
      num_workers,
      is_chief,
      distribution_strategy,
    };

    info!(
      out_dir = %hook.out_dir,
      worker_id = %hook.worker_id,
      num_workers = hook.num_workers,
      is_chief = hook.is_chief,
      strategy = %hook.distribution_strategy,
      "hook created"
    );

    Ok(hook)
  }

  pub fn out_dir(&self) -> &str {
    &self.out_dir
  }

  pub fn worker_id(&self) -> &str {
    &self.worker_id
  }

  pub fn num_workers(&self) -> usize {
    self.num_workers
  }

  /// Whether this worker does the chief's extra work.
  pub fn is_chief(&self) -> bool {
    self.is_chief
  }

  pub fn distribution_strategy(&self) -> DistributionStrategy {
    self.distribution_strategy
  }
}
