//! Minifiers producing the single production artifact of a bundle.

mod scripts;
mod styles;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use scripts::{ScriptMinifier, minify_script};
pub use styles::{StyleMinifier, minify_style};

/// Turns an ordered list of source files into one minified document.
///
/// Each implementation owns how the individual files are joined.
pub trait Minifier {
  /// Minify and concatenate `paths` in order.
  fn minify(&self, paths: &[PathBuf]) -> Result<String>;
}

fn read_source(path: &Path) -> Result<String> {
  fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
