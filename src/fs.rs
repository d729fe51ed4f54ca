//! Local filesystem collaborators rooted at the project directory.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{BundleError, Result};
use crate::expand::GlobMatcher;
use crate::variant::FileProbe;

/// Filesystem view used by a bundle: glob expansion, existence checks and path mapping.
pub trait AssetFiles: GlobMatcher + FileProbe {
  /// Location of a resolved relative path, suitable for reading its contents.
  fn locate(&self, relative: &str) -> PathBuf;
  /// Express an absolute path relative to the project root when possible.
  fn relativize(&self, path: &Path) -> String;
}

/// Glob matching and existence checks against files below `root`.
///
/// Relative paths are interpreted against the root and matches are reported relative to it,
/// always with forward slashes so they can be written straight into HTML.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
  root: PathBuf,
}

impl LocalFileSystem {
  /// Create a filesystem view rooted at `root`.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn rooted_pattern(&self, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
      return pattern.to_string();
    }
    let root = Pattern::escape(&to_slash(&self.root));
    format!("{}/{}", root.trim_end_matches('/'), pattern)
  }

  /// Glob match reported the way the pattern was written: the root is removed as text so
  /// `./` and `..` components of the pattern survive.
  fn pattern_relative(&self, path: &Path) -> String {
    let text = to_slash(path);
    let root = to_slash(&self.root);
    let prefix = format!("{}/", root.trim_end_matches('/'));
    text
      .strip_prefix(&prefix)
      .map(str::to_string)
      .unwrap_or(text)
  }
}

/// Options shared by glob expansion and ignore rules: wildcards never cross `/` and never
/// match a leading dot.
pub(crate) fn match_options() -> MatchOptions {
  MatchOptions {
    require_literal_separator: true,
    require_literal_leading_dot: true,
    ..MatchOptions::new()
  }
}

/// Whether `path` is matched by any ignore rule, with or without a leading `./`.
pub(crate) fn is_ignored(ignored: &[Pattern], path: &str) -> bool {
  let bare = path.strip_prefix("./").unwrap_or(path);
  let options = match_options();
  ignored
    .iter()
    .any(|rule| rule.matches_with(path, options) || rule.matches_with(bare, options))
}

impl AssetFiles for LocalFileSystem {
  fn locate(&self, relative: &str) -> PathBuf {
    self.root.join(relative)
  }

  fn relativize(&self, path: &Path) -> String {
    let relative = path.strip_prefix(&self.root).unwrap_or(path);
    to_slash(relative)
  }
}

impl FileProbe for LocalFileSystem {
  fn exists(&self, path: &str) -> bool {
    !path.is_empty() && self.locate(path).is_file()
  }
}

impl GlobMatcher for LocalFileSystem {
  fn matches(&self, pattern: &str, ignore: &[String]) -> Result<Vec<String>> {
    if pattern.is_empty() {
      return Ok(Vec::new());
    }

    let ignored = ignore
      .iter()
      .map(|text| compile(text))
      .collect::<Result<Vec<_>>>()?;

    let rooted = self.rooted_pattern(pattern);
    let paths = glob::glob_with(&rooted, match_options()).map_err(|source| {
      BundleError::InvalidGlob {
        pattern: pattern.to_string(),
        source,
      }
    })?;

    let mut matches = Vec::new();
    for entry in paths {
      let path = entry?;
      if !path.is_file() {
        continue;
      }
      let relative = if Path::new(pattern).is_absolute() {
        to_slash(&path)
      } else {
        self.pattern_relative(&path)
      };
      if is_ignored(&ignored, &relative) {
        tracing::trace!(path = %relative, "ignored glob match");
        continue;
      }
      matches.push(relative);
    }
    Ok(matches)
  }
}

fn compile(text: &str) -> Result<Pattern> {
  Pattern::new(text).map_err(|source| BundleError::InvalidGlob {
    pattern: text.to_string(),
    source,
  })
}

/// Render a path with forward slashes regardless of platform.
pub(crate) fn to_slash(path: &Path) -> String {
  path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
  }

  #[test]
  fn matches_are_relative_and_sorted() {
    let dir = tempdir().unwrap();
    for name in ["exists2", "exists1", "exists4", "exists3"] {
      touch(dir.path(), name);
    }

    let files = LocalFileSystem::new(dir.path());
    let matches = files.matches("exists*", &["exists3".into()]).unwrap();
    assert_eq!(matches, vec!["exists1", "exists2", "exists4"]);
  }

  #[test]
  fn skips_directories_and_handles_nested_globs() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "css/site.css");
    touch(dir.path(), "css/vendor/reset.css");
    fs::create_dir_all(dir.path().join("css/empty.css")).unwrap();

    let files = LocalFileSystem::new(dir.path());
    let mut matches = files.matches("css/**/*.css", &[]).unwrap();
    matches.sort();
    assert_eq!(matches, vec!["css/site.css", "css/vendor/reset.css"]);
  }

  #[test]
  fn empty_pattern_matches_nothing() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "a.js");
    let files = LocalFileSystem::new(dir.path());
    assert!(files.matches("", &[]).unwrap().is_empty());
    assert!(!files.exists(""));
  }

  #[test]
  fn rejects_invalid_ignore_patterns() {
    let dir = tempdir().unwrap();
    let files = LocalFileSystem::new(dir.path());
    let err = files.matches("*.js", &["[".into()]).unwrap_err();
    assert!(matches!(err, BundleError::InvalidGlob { .. }));
  }

  #[test]
  fn exists_only_reports_files() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "lib/app.js");
    let files = LocalFileSystem::new(dir.path());
    assert!(files.exists("lib/app.js"));
    assert!(!files.exists("lib"));
    assert!(!files.exists("lib/missing.js"));
  }

  #[test]
  fn keeps_current_dir_prefix_of_pattern() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "js/a.js");
    touch(dir.path(), "js/b.js");

    let files = LocalFileSystem::new(dir.path());
    let matches = files.matches("./js/*.js", &["js/b.js".into()]).unwrap();
    assert_eq!(matches, vec!["./js/a.js"]);
  }

  #[test]
  fn ignore_wildcards_stay_within_one_directory() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "js/a.js");
    touch(dir.path(), "js/vendor/v.js");

    let files = LocalFileSystem::new(dir.path());
    let matches = files.matches("js/**/*.js", &["js/*.js".into()]).unwrap();
    assert_eq!(matches, vec!["js/vendor/v.js"]);
  }

  #[test]
  fn wildcards_skip_dotfiles() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "js/.hidden.js");
    touch(dir.path(), "js/a.js");

    let files = LocalFileSystem::new(dir.path());
    assert_eq!(files.matches("js/*.js", &[]).unwrap(), vec!["js/a.js"]);
  }

  #[test]
  fn relativize_keeps_foreign_paths() {
    let files = LocalFileSystem::new("/srv/site");
    assert_eq!(
      files.relativize(Path::new("/srv/site/bower_components/a/a.js")),
      "bower_components/a/a.js"
    );
    assert_eq!(files.relativize(Path::new("/opt/b.js")), "/opt/b.js");
  }
}
