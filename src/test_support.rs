//! In-memory collaborators for unit tests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{BundleError, Result};
use crate::expand::GlobMatcher;
use crate::fs::{AssetFiles, is_ignored, match_options, to_slash};
use crate::variant::FileProbe;

/// Set of relative file paths answering glob and existence queries without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
  files: BTreeSet<String>,
}

impl MemoryFiles {
  pub fn new<I, S>(files: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      files: files.into_iter().map(Into::into).collect(),
    }
  }
}

impl AssetFiles for MemoryFiles {
  fn locate(&self, relative: &str) -> PathBuf {
    PathBuf::from(relative)
  }

  fn relativize(&self, path: &Path) -> String {
    to_slash(path)
  }
}

impl FileProbe for MemoryFiles {
  fn exists(&self, path: &str) -> bool {
    self.files.contains(path)
  }
}

impl GlobMatcher for MemoryFiles {
  fn matches(&self, pattern: &str, ignore: &[String]) -> Result<Vec<String>> {
    let compile = |text: &str| {
      glob::Pattern::new(text).map_err(|source| BundleError::InvalidGlob {
        pattern: text.to_string(),
        source,
      })
    };
    let include = compile(pattern)?;
    let ignored = ignore
      .iter()
      .map(|text| compile(text))
      .collect::<Result<Vec<_>>>()?;

    Ok(
      self
        .files
        .iter()
        .filter(|path| include.matches_with(path, match_options()))
        .filter(|path| !is_ignored(&ignored, path))
        .cloned()
        .collect(),
    )
  }
}
