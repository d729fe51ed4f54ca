//! Prefix substitution applied to rendered development paths.

/// Ordered prefix → replacement rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebaseMap {
  rules: Vec<(String, String)>,
}

impl RebaseMap {
  /// Append rules, keeping registration order.
  pub fn extend<I, K, V>(&mut self, rules: I)
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self
      .rules
      .extend(rules.into_iter().map(|(prefix, replacement)| (prefix.into(), replacement.into())));
  }

  /// Rewrite `path` through every rule in order.
  ///
  /// Each rule sees the output of the previous one, so a later rule may rewrite a path an
  /// earlier rule already changed.
  pub fn apply(&self, path: &str) -> String {
    self
      .rules
      .iter()
      .fold(path.to_string(), |current, (prefix, replacement)| {
        let rewritten = current
          .strip_prefix(prefix.as_str())
          .map(|rest| format!("{replacement}{rest}"));
        rewritten.unwrap_or(current)
      })
  }

  /// Whether no rules are configured.
  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }
}
