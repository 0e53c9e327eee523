const S3_SCHEME: &str = "s3://";

/// A location in S3, `s3://{bucket}/{key}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Path {
  pub bucket: String,
  /// Object key prefix, without a leading slash. May be empty.
  pub key: String,
}

impl S3Path {
  /// Parse an `s3://` locator. Returns `None` for anything else.
  pub fn parse(path: &str) -> Option<Self> {
    let rest = path.strip_prefix(S3_SCHEME)?;
    let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
    Some(Self {
      bucket: bucket.to_string(),
      key: key.to_string(),
    })
  }

  pub fn is_s3(path: &str) -> bool {
    path.starts_with(S3_SCHEME)
  }
}

/// Expand a leading `~` to the current user's home directory.
///
/// Only `~` and `~/...` are expanded; anything else, or a system without a
/// home directory, leaves the path untouched.
pub fn expand_home(path: &str) -> String {
  let rest = match path.strip_prefix('~') {
    Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
    _ => return path.to_string(),
  };

  match dirs::home_dir() {
    Some(home) => format!("{}{}", home.display(), rest),
    None => path.to_string(),
  }
}
