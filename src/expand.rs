//! Expansion of registered patterns into raw file paths.

use crate::canonical::{EntrySource, ResolutionList};
use crate::error::Result;
use crate::pattern::{Pattern, PatternRegistry};

/// Glob engine used to expand glob patterns.
///
/// Matches are returned in the engine's own order with every path matching one of `ignore`
/// already removed.
pub trait GlobMatcher {
  /// Expand `pattern`, skipping paths matched by any `ignore` pattern.
  fn matches(&self, pattern: &str, ignore: &[String]) -> Result<Vec<String>>;
}

/// Raw paths produced by a single pattern.
///
/// Explicit files pass through unchanged whether or not they exist; globs yield zero or more
/// matches without signalling an empty result.
pub fn expand<M>(pattern: &Pattern, matcher: &M) -> Result<Vec<String>>
where
  M: GlobMatcher + ?Sized,
{
  match pattern {
    Pattern::File(path) => Ok(vec![path.clone()]),
    Pattern::Glob { pattern, ignore } => {
      let matches = matcher.matches(pattern, ignore)?;
      tracing::trace!(pattern = %pattern, count = matches.len(), "expanded glob");
      Ok(matches)
    }
  }
}

/// Fold every pattern, in registration order, into `list`.
pub fn expand_into<M>(
  patterns: &PatternRegistry,
  matcher: &M,
  list: &mut ResolutionList,
) -> Result<()>
where
  M: GlobMatcher + ?Sized,
{
  for pattern in patterns.iter() {
    let source = if pattern.is_file() {
      EntrySource::Explicit
    } else {
      EntrySource::Glob
    };
    for raw_path in expand(pattern, matcher)? {
      list.insert(&raw_path, source);
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::MemoryFiles;

  fn exists_files() -> MemoryFiles {
    MemoryFiles::new(["exists1", "exists2", "exists3", "exists4"])
  }

  fn resolve(patterns: &[Pattern]) -> Vec<String> {
    let mut registry = PatternRegistry::default();
    for pattern in patterns {
      registry.push(pattern.clone());
    }
    let mut list = ResolutionList::default();
    expand_into(&registry, &exists_files(), &mut list).unwrap();
    list
      .entries()
      .iter()
      .map(|entry| entry.identity.stem_path())
      .collect()
  }

  fn glob(pattern: &str) -> Pattern {
    Pattern::Glob {
      pattern: pattern.into(),
      ignore: Vec::new(),
    }
  }

  #[test]
  fn explicit_files_pass_through_without_existing() {
    let expanded = expand(&Pattern::File("missing.css".into()), &exists_files()).unwrap();
    assert_eq!(expanded, vec!["missing.css".to_string()]);
  }

  #[test]
  fn globs_apply_ignore_lists() {
    let pattern = Pattern::Glob {
      pattern: "exists*".into(),
      ignore: vec!["exists3".into()],
    };
    let expanded = expand(&pattern, &exists_files()).unwrap();
    assert_eq!(expanded, vec!["exists1", "exists2", "exists4"]);
  }

  #[test]
  fn ignore_rules_do_not_cross_directories() {
    let files = MemoryFiles::new(["js/a.js", "js/vendor/v.js", "js/.hidden.js"]);
    let pattern = Pattern::Glob {
      pattern: "js/**/*.js".into(),
      ignore: vec!["js/*.js".into()],
    };
    assert_eq!(expand(&pattern, &files).unwrap(), vec!["js/vendor/v.js"]);
  }

  #[test]
  fn globs_without_matches_are_empty() {
    assert!(expand(&glob("nothing*"), &exists_files()).unwrap().is_empty());
  }

  #[test]
  fn explicit_redeclaration_after_glob_moves_to_end() {
    let order = resolve(&[
      Pattern::File("exists2".into()),
      glob("exists*"),
      Pattern::File("exists3".into()),
    ]);
    assert_eq!(order, vec!["exists2", "exists1", "exists4", "exists3"]);
  }

  #[test]
  fn overlapping_globs_keep_first_order() {
    let order = resolve(&[glob("exists*"), glob("exists[12]")]);
    assert_eq!(order, vec!["exists1", "exists2", "exists3", "exists4"]);
  }
}
