//! Third-party package inclusion.
//!
//! A [`PackageResolver`] turns the installed package tree into an ordered list of main files
//! where dependencies always precede their dependents. The bundle merges these files after all
//! of its own patterns.

mod bower;

use std::collections::BTreeSet;
use std::path::PathBuf;

pub use bower::{BowerResolver, DEFAULT_MANIFEST_FILE, DEFAULT_PACKAGES_DIR};

/// Resolver for installed third-party packages.
pub trait PackageResolver {
  /// Main files of every reachable package whose path ends with `extension`, ordered so that
  /// dependencies come first. Packages named in `excluded` are skipped entirely.
  fn resolve(
    &self,
    extension: &str,
    include_dev: bool,
    excluded: &BTreeSet<String>,
  ) -> anyhow::Result<Vec<PathBuf>>;
}

/// Per-bundle settings controlling which packages are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInclusion {
  /// Also include the root manifest's development dependencies.
  pub include_dev: bool,
  /// Package names passed to the resolver as ignored.
  pub excluded: BTreeSet<String>,
}

impl PackageInclusion {
  /// Build settings from a dev flag and a list of excluded package names.
  pub fn new<I, S>(include_dev: bool, excluded: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      include_dev,
      excluded: normalise_names(excluded.into_iter().map(Into::into)),
    }
  }
}

/// Trim package names and discard empty entries.
fn normalise_names(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  values
    .into_iter()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
    .collect()
}
