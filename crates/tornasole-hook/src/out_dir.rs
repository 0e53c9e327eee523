use tracing::warn;

use crate::access::DirChecker;
use crate::env::TrainingEnvironment;
use crate::error::HookError;
use crate::path::{S3Path, expand_home};

/// Resolve the single output location of a hook.
///
/// Under a managed service the service path always wins and a caller path is
/// ignored with a warning. The service guarantees it exists and is unique per
/// job, so it is not checked.
///
/// Otherwise the caller path is required. Local paths get `~` expanded, and
/// a location that already exists is rejected so output from two runs never
/// ends up in the same place. Nothing is created here.
pub fn verify_and_get_out_dir(
  out_dir: Option<&str>,
  env: &dyn TrainingEnvironment,
  checker: &dyn DirChecker,
) -> Result<String, HookError> {
  if env.is_managed_job() {
    let managed = env.managed_out_dir();
    if let Some(ignored) = out_dir {
      warn!(
        out_dir = ignored,
        managed_out_dir = %managed,
        "out_dir was set but the job is running in a SageMaker environment, ignoring it"
      );
    }
    return Ok(managed);
  }

  let out_dir = out_dir.ok_or(HookError::MissingOutDir)?;
  let out_dir = if S3Path::is_s3(out_dir) {
    out_dir.to_string()
  } else {
    expand_home(out_dir)
  };

  checker.check(&out_dir)?;
  Ok(out_dir)
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use tracing_test::traced_test;

  use super::*;
  use crate::access::LocalDirChecker;
  use crate::env::{DEFAULT_SAGEMAKER_OUT_DIR, SageMakerEnvironment};

  fn managed() -> SageMakerEnvironment {
    SageMakerEnvironment::new(Some("training-job".to_string()))
  }

  fn unmanaged() -> SageMakerEnvironment {
    SageMakerEnvironment::new(None)
  }

  /// Records every path it is asked about.
  #[derive(Default)]
  struct RecordingChecker {
    seen: RefCell<Vec<String>>,
  }

  impl DirChecker for RecordingChecker {
    fn check(&self, path: &str) -> Result<(), HookError> {
      self.seen.borrow_mut().push(path.to_string());
      Ok(())
    }
  }

  #[test]
  fn test_unmanaged_requires_out_dir() {
    let err = verify_and_get_out_dir(None, &unmanaged(), &LocalDirChecker::new()).unwrap_err();
    assert!(matches!(err, HookError::MissingOutDir));
  }

  #[test]
  fn test_unmanaged_existing_dir_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap();
    let err =
      verify_and_get_out_dir(Some(path), &unmanaged(), &LocalDirChecker::new()).unwrap_err();
    assert!(matches!(err, HookError::OutDirExists { .. }));
  }

  #[test]
  fn test_unmanaged_fresh_dir_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run-1");
    let path = path.to_str().unwrap();
    let resolved =
      verify_and_get_out_dir(Some(path), &unmanaged(), &LocalDirChecker::new()).unwrap();
    assert_eq!(resolved, path);
    assert!(!dir.path().join("run-1").exists());
  }

  #[test]
  fn test_unmanaged_expands_home_before_checking() {
    let checker = RecordingChecker::default();
    let resolved = verify_and_get_out_dir(Some("~/tornasole-run"), &unmanaged(), &checker).unwrap();
    assert_eq!(resolved, expand_home("~/tornasole-run"));
    assert_eq!(*checker.seen.borrow(), vec![resolved]);
  }

  #[test]
  fn test_unmanaged_s3_is_not_expanded() {
    let checker = RecordingChecker::default();
    let resolved = verify_and_get_out_dir(Some("s3://bucket/~/run"), &unmanaged(), &checker).unwrap();
    assert_eq!(resolved, "s3://bucket/~/run");
    assert_eq!(checker.seen.borrow().len(), 1);
  }

  #[test]
  #[traced_test]
  fn test_managed_ignores_out_dir_with_one_warning() {
    let checker = RecordingChecker::default();
    let resolved = verify_and_get_out_dir(Some("/tmp/mine"), &managed(), &checker).unwrap();

    assert_eq!(resolved, DEFAULT_SAGEMAKER_OUT_DIR);
    assert!(checker.seen.borrow().is_empty());
    logs_assert(|lines: &[&str]| {
      match lines.iter().filter(|line| line.contains("WARN")).count() {
        1 => Ok(()),
        n => Err(format!("expected exactly one warning, got {n}")),
      }
    });
  }

  #[test]
  #[traced_test]
  fn test_managed_without_out_dir_is_silent() {
    let resolved =
      verify_and_get_out_dir(None, &managed(), &LocalDirChecker::new()).unwrap();

    assert_eq!(resolved, DEFAULT_SAGEMAKER_OUT_DIR);
    assert!(!logs_contain("WARN"));
  }

  #[test]
  fn test_managed_path_is_not_checked() {
    let dir = tempfile::tempdir().unwrap();
    let env = managed().with_out_dir(dir.path().to_str().unwrap());
    let resolved = verify_and_get_out_dir(None, &env, &LocalDirChecker::new()).unwrap();
    assert_eq!(resolved, dir.path().to_str().unwrap());
  }
}
