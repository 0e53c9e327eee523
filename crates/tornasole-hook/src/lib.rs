//! Tornasole Hook
//!
//! Everything a hook settles once, at construction:
//!
//! - where its output goes ([`verify_and_get_out_dir`]), which depends on
//!   whether the job runs under a managed training service;
//! - who it is within the cluster (worker id, worker count, chief or not).
//!
//! Collaborators sit behind traits so they can be swapped in tests:
//! [`TrainingEnvironment`] detects the managed service, [`DirChecker`]
//! decides whether an output location is already taken.

mod access;
mod config;
mod env;
mod error;
mod hook;
mod out_dir;
mod path;

pub use access::{DirChecker, LocalDirChecker, ObjectLister};
pub use config::{CONFIG_FILE_PATH_ENV, HookConfig};
pub use env::{
  DEFAULT_SAGEMAKER_OUT_DIR, SageMakerEnvironment, TRAINING_JOB_NAME_ENV, TrainingEnvironment,
};
pub use error::HookError;
pub use hook::{DEFAULT_WORKER_ID, Hook, HookContext};
pub use out_dir::verify_and_get_out_dir;
pub use path::{S3Path, expand_home};
