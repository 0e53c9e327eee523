use std::path::Path;

use tracing::debug;

use crate::error::HookError;
use crate::path::S3Path;

/// Decides whether an output location already holds data.
pub trait DirChecker {
  /// Returns [`HookError::OutDirExists`] if something lives at `path`.
  fn check(&self, path: &str) -> Result<(), HookError>;
}

/// Lists objects in a remote bucket.
pub trait ObjectLister {
  /// Whether any object exists under the prefix.
  fn has_objects(&self, location: &S3Path) -> Result<bool, HookError>;
}

/// Checks local paths on the filesystem and hands `s3://` paths to an
/// [`ObjectLister`], if one is configured.
#[derive(Default)]
pub struct LocalDirChecker {
  remote: Option<Box<dyn ObjectLister>>,
}

impl LocalDirChecker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_object_lister(mut self, lister: impl ObjectLister + 'static) -> Self {
    self.remote = Some(Box::new(lister));
    self
  }
}

impl DirChecker for LocalDirChecker {
  fn check(&self, path: &str) -> Result<(), HookError> {
    if let Some(location) = S3Path::parse(path) {
      let Some(remote) = &self.remote else {
        debug!(path, "no object lister configured, skipping remote existence check");
        return Ok(());
      };
      if remote.has_objects(&location)? {
        return Err(HookError::OutDirExists {
          path: path.to_string(),
          location: "s3",
        });
      }
      return Ok(());
    }

    if Path::new(path).try_exists()? {
      return Err(HookError::OutDirExists {
        path: path.to_string(),
        location: "local disk",
      });
    }
    Ok(())
  }
}
