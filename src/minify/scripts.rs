//! Script minification.
//!
//! The scanner removes comments and collapses whitespace while copying string, template and
//! regular expression literals verbatim. Line breaks are kept (collapsed to one) so automatic
//! semicolon insertion behaves exactly as in the source.

use std::iter::Peekable;
use std::path::PathBuf;
use std::str::Chars;

use anyhow::Result;

use super::{Minifier, read_source};

/// Characters after which a `/` starts a regular expression literal rather than a division.
const REGEX_PRECEDERS: &str = "(,=:[!&|?{};+-*%<>~^";

/// Separator placed between concatenated scripts.
const SCRIPT_SEPARATOR: &str = ";\n";

#[derive(Default)]
struct Output {
  text: String,
  pending_space: bool,
  pending_newline: bool,
}

impl Output {
  /// Emit any pending whitespace needed before `next`, then `next` itself.
  fn push(&mut self, next: char) {
    if !self.text.is_empty() {
      if self.pending_newline {
        self.text.push('\n');
      } else if self.pending_space && self.needs_space_before(next) {
        self.text.push(' ');
      }
    }
    self.pending_space = false;
    self.pending_newline = false;
    self.text.push(next);
  }

  fn push_raw(&mut self, next: char) {
    self.text.push(next);
  }

  fn needs_space_before(&self, next: char) -> bool {
    let Some(last) = self.text.chars().last() else {
      return false;
    };
    (is_word(last) && is_word(next)) || (last == next && matches!(next, '+' | '-'))
  }

  fn regex_allowed(&self) -> bool {
    let trimmed = self.text.trim_end();
    match trimmed.chars().last() {
      None => true,
      Some(last) if REGEX_PRECEDERS.contains(last) => true,
      Some(_) => ["return", "typeof", "case"]
        .iter()
        .any(|keyword| ends_with_word(trimmed, keyword)),
    }
  }
}

fn is_word(c: char) -> bool {
  c.is_alphanumeric() || c == '_' || c == '$'
}

fn ends_with_word(text: &str, word: &str) -> bool {
  text
    .strip_suffix(word)
    .is_some_and(|rest| !rest.chars().last().is_some_and(is_word))
}

fn copy_quoted(quote: char, chars: &mut Peekable<Chars<'_>>, out: &mut Output) {
  out.push(quote);
  while let Some(c) = chars.next() {
    out.push_raw(c);
    if c == '\\' {
      if let Some(escaped) = chars.next() {
        out.push_raw(escaped);
      }
    } else if c == quote {
      break;
    }
  }
}

fn copy_regex(chars: &mut Peekable<Chars<'_>>, out: &mut Output) {
  out.push('/');
  let mut in_class = false;
  while let Some(c) = chars.next() {
    out.push_raw(c);
    match c {
      '\\' => {
        if let Some(escaped) = chars.next() {
          out.push_raw(escaped);
        }
      }
      '[' => in_class = true,
      ']' => in_class = false,
      '/' if !in_class => break,
      '\n' => break,
      _ => {}
    }
  }
}

fn skip_block_comment(chars: &mut Peekable<Chars<'_>>) -> bool {
  let mut saw_newline = false;
  let mut previous = '\0';
  for c in chars.by_ref() {
    if previous == '*' && c == '/' {
      break;
    }
    saw_newline |= c == '\n';
    previous = c;
  }
  saw_newline
}

/// Strip comments and redundant whitespace from a script.
pub fn minify_script(source: &str) -> String {
  let mut out = Output::default();
  let mut chars = source.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '"' | '\'' | '`' => copy_quoted(c, &mut chars, &mut out),
      '/' if chars.peek() == Some(&'/') => {
        for skipped in chars.by_ref() {
          if skipped == '\n' {
            out.pending_newline = true;
            break;
          }
        }
      }
      '/' if chars.peek() == Some(&'*') => {
        chars.next();
        if skip_block_comment(&mut chars) {
          out.pending_newline = true;
        } else {
          out.pending_space = true;
        }
      }
      '/' if out.regex_allowed() => copy_regex(&mut chars, &mut out),
      '\n' | '\r' => out.pending_newline = true,
      c if c.is_whitespace() => out.pending_space = true,
      c => out.push(c),
    }
  }

  out.text
}

/// Minifier for script bundles; non-empty files are joined with `;` and a line break.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptMinifier;

impl Minifier for ScriptMinifier {
  fn minify(&self, paths: &[PathBuf]) -> Result<String> {
    let mut parts = Vec::with_capacity(paths.len());
    for path in paths {
      let minified = minify_script(&read_source(path)?);
      if !minified.is_empty() {
        parts.push(minified);
      }
    }
    Ok(parts.join(SCRIPT_SEPARATOR))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  #[test]
  fn strips_comments_and_collapses_whitespace() {
    let source = "/*Useless comment*/\nif(false) {\n\tconsole.log('never here');\n}\nconsole.log('lol');\n (function() { function test(){} test(); })();";
    assert_eq!(
      minify_script(source),
      "if(false){\nconsole.log('never here');\n}\nconsole.log('lol');\n(function(){function test(){}test();})();"
    );
  }

  #[test]
  fn keeps_string_contents_untouched() {
    let source = "var a = \"x // not a comment\"; // real comment\nvar b = '/* also not */  kept';";
    assert_eq!(
      minify_script(source),
      "var a=\"x // not a comment\";\nvar b='/* also not */  kept';"
    );
  }

  #[test]
  fn copies_regex_literals() {
    let source = "var re = /\\/\\/[/]x/g; return /a b/.test(s);";
    assert_eq!(
      minify_script(source),
      "var re=/\\/\\/[/]x/g;return/a b/.test(s);"
    );
  }

  #[test]
  fn preserves_increment_spacing() {
    assert_eq!(minify_script("a + +b; c - -d; e / f"), "a+ +b;c- -d;e/f");
  }

  #[test]
  fn multiline_block_comments_keep_line_break() {
    assert_eq!(minify_script("return /*\n*/ x"), "return\nx");
  }

  #[test]
  fn joins_files_and_skips_empty_ones() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.js");
    let empty = dir.path().join("empty.js");
    let second = dir.path().join("b.js");
    fs::write(&first, "a()").unwrap();
    fs::write(&empty, "// nothing here\n").unwrap();
    fs::write(&second, "b()").unwrap();

    let output = ScriptMinifier.minify(&[first, empty, second]).unwrap();
    assert_eq!(output, "a();\nb()");
  }
}
