//! Stylesheet minification.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;

use super::{Minifier, read_source};

struct StyleRules {
  comments: Regex,
  whitespace: Regex,
  punctuation: Regex,
  after_colon: Regex,
  trailing_semicolon: Regex,
}

fn style_rules() -> &'static StyleRules {
  static RULES: OnceLock<StyleRules> = OnceLock::new();
  RULES.get_or_init(|| StyleRules {
    comments: Regex::new(r"(?s)/\*.*?\*/").expect("invalid comment regex"),
    whitespace: Regex::new(r"\s+").expect("invalid whitespace regex"),
    punctuation: Regex::new(r"\s*([{};,>])\s*").expect("invalid punctuation regex"),
    after_colon: Regex::new(r":\s+").expect("invalid colon regex"),
    trailing_semicolon: Regex::new(r";+\}").expect("invalid semicolon regex"),
  })
}

/// Strip comments and redundant whitespace from a stylesheet.
///
/// Whitespace before a colon is kept so descendant pseudo-class selectors such as `a :hover`
/// keep their meaning.
pub fn minify_style(source: &str) -> String {
  let rules = style_rules();
  let text = rules.comments.replace_all(source, "");
  let text = rules.whitespace.replace_all(&text, " ");
  let text = rules.punctuation.replace_all(&text, "$1");
  let text = rules.after_colon.replace_all(&text, ":");
  let text = rules.trailing_semicolon.replace_all(&text, "}");
  text.trim().to_string()
}

/// Minifier for style bundles; files are concatenated without a separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleMinifier;

impl Minifier for StyleMinifier {
  fn minify(&self, paths: &[PathBuf]) -> Result<String> {
    let mut output = String::new();
    for path in paths {
      output.push_str(&minify_style(&read_source(path)?));
    }
    Ok(output)
  }
}
