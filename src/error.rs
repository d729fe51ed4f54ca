//! Error type shared by bundle resolution, rendering and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Failures surfaced while resolving or rendering bundles.
///
/// Missing files and unmatched patterns are never reported here; they are dropped from the
/// output instead.
#[derive(Debug, Error)]
pub enum BundleError {
  /// A bundle definition did not declare whether it holds styles or scripts.
  #[error("bundle `{name}` does not declare a content kind")]
  MissingKind {
    /// Name of the offending bundle.
    name: String,
  },
  /// A glob or ignore pattern could not be compiled.
  #[error("invalid glob pattern `{pattern}`")]
  InvalidGlob {
    /// Pattern text as registered.
    pattern: String,
    /// Source compilation error.
    #[source]
    source: glob::PatternError,
  },
  /// A directory entry could not be read while expanding a glob.
  #[error("failed to walk glob matches")]
  Glob(#[from] glob::GlobError),
  /// Reading a file from disk failed.
  #[error("failed to read {}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// A JSON document could not be parsed.
  #[error("failed to parse {}", path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
  /// A pluggable collaborator (minifier, package resolver) failed.
  #[error(transparent)]
  Collaborator(#[from] anyhow::Error),
}
