//! Ordered include patterns registered on a bundle.

use std::collections::BTreeSet;

/// A single include declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
  /// Explicit file path, emitted as-is whether or not it exists.
  File(String),
  /// Glob expanded by the glob collaborator.
  Glob {
    /// Glob text.
    pattern: String,
    /// Patterns removed from the glob's matches.
    ignore: Vec<String>,
  },
}

impl Pattern {
  /// Text used to detect duplicate registrations.
  pub fn text(&self) -> &str {
    match self {
      Self::File(path) => path,
      Self::Glob { pattern, .. } => pattern,
    }
  }

  /// Whether the pattern is an explicit file declaration.
  pub fn is_file(&self) -> bool {
    matches!(self, Self::File(_))
  }
}

/// Append-only list of patterns, unique by text and kept in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
  seen: BTreeSet<String>,
  patterns: Vec<Pattern>,
}

impl PatternRegistry {
  /// Register a pattern. Returns `false` when one with the same text already exists.
  pub fn push(&mut self, pattern: Pattern) -> bool {
    if !self.seen.insert(pattern.text().to_string()) {
      tracing::trace!(pattern = pattern.text(), "pattern already registered");
      return false;
    }
    self.patterns.push(pattern);
    true
  }

  /// Registered patterns in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
    self.patterns.iter()
  }

  /// Number of registered patterns.
  pub fn len(&self) -> usize {
    self.patterns.len()
  }

  /// Whether nothing has been registered.
  pub fn is_empty(&self) -> bool {
    self.patterns.is_empty()
  }
}
