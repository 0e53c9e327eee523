/// Set by SageMaker for every training job.
pub const TRAINING_JOB_NAME_ENV: &str = "TRAINING_JOB_NAME";

/// Where SageMaker collects hook output. Created by the service, unique per job.
pub const DEFAULT_SAGEMAKER_OUT_DIR: &str = "/opt/ml/output/tensors";

/// The execution environment a hook runs in.
pub trait TrainingEnvironment {
  /// Whether a managed training service owns the output location.
  fn is_managed_job(&self) -> bool;

  /// Output location assigned by the managed service.
  fn managed_out_dir(&self) -> String;
}

/// SageMaker detection based on the job name variable.
#[derive(Debug, Clone)]
pub struct SageMakerEnvironment {
  job_name: Option<String>,
  out_dir: String,
}

impl SageMakerEnvironment {
  pub fn new(job_name: Option<String>) -> Self {
    Self {
      job_name,
      out_dir: DEFAULT_SAGEMAKER_OUT_DIR.to_string(),
    }
  }

  /// Read the job name from the process environment.
  pub fn from_env() -> Self {
    Self::new(std::env::var(TRAINING_JOB_NAME_ENV).ok())
  }

  pub fn with_out_dir(mut self, out_dir: impl Into<String>) -> Self {
    self.out_dir = out_dir.into();
    self
  }
}

impl TrainingEnvironment for SageMakerEnvironment {
  fn is_managed_job(&self) -> bool {
    self.job_name.is_some()
  }

  fn managed_out_dir(&self) -> String {
    self.out_dir.clone()
  }
}
