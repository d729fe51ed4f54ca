//! Project configuration loader describing bundles declaratively.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::bundle::{BundleKind, BundleServices};
use crate::environment::RenderContext;
use crate::error::{BundleError, Result};
use crate::packages::{BowerResolver, DEFAULT_MANIFEST_FILE, DEFAULT_PACKAGES_DIR};
use crate::registry::BundleRegistry;

/// File name searched for in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "bdlr.config.json";

/// Discoverable project configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
  /// Environment override; when absent the process environment decides.
  pub environment: Option<String>,
  /// Directory holding installed third-party packages.
  pub packages_dir: String,
  /// Root package manifest file name.
  pub package_manifest: String,
  /// Bundle definitions in declaration order.
  pub bundles: Vec<BundleDefinition>,
}

impl Default for BundlerConfig {
  fn default() -> Self {
    Self {
      environment: None,
      packages_dir: DEFAULT_PACKAGES_DIR.into(),
      package_manifest: DEFAULT_MANIFEST_FILE.into(),
      bundles: Vec::new(),
    }
  }
}

/// One bundle as declared in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleDefinition {
  /// Registry name.
  pub name: String,
  /// Content kind; required.
  #[serde(default)]
  pub kind: Option<BundleKind>,
  /// Production URL of the pre-built artifact.
  #[serde(default)]
  pub url: Option<String>,
  /// Include patterns in registration order.
  #[serde(default)]
  pub include: Vec<IncludeDefinition>,
  /// Third-party package inclusion.
  #[serde(default)]
  pub packages: Option<PackageDefinition>,
  /// Rebase rules in application order.
  #[serde(default)]
  pub rebase: Vec<RebaseDefinition>,
}

/// Either `{"file": ...}` or `{"glob": ..., "ignore": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IncludeDefinition {
  /// Explicit file.
  File {
    /// File path.
    file: String,
  },
  /// Glob with optional ignore patterns.
  Glob {
    /// Glob pattern.
    glob: String,
    /// Patterns excluded from the matches.
    #[serde(default)]
    ignore: Vec<String>,
  },
}

/// Package inclusion settings of a bundle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageDefinition {
  /// Include development dependencies of the root manifest.
  pub include_dev: bool,
  /// Package names to leave out.
  pub exclude: Vec<String>,
}

/// Single rebase rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RebaseDefinition {
  /// Path prefix to replace.
  pub prefix: String,
  /// Replacement prefix.
  pub replacement: String,
}

impl BundlerConfig {
  /// Load `bdlr.config.json` from `root`, falling back to defaults when it does not exist.
  pub fn discover(root: &Path) -> Result<Self> {
    let candidate = root.join(DEFAULT_CONFIG_FILE);
    if !candidate.exists() {
      return Ok(Self::default());
    }
    Self::from_path(&candidate)
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path).map_err(|source| BundleError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| BundleError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Render context from the configured environment, or from the process environment.
  pub fn render_context(&self) -> RenderContext {
    match self.environment.as_deref() {
      Some(value) => RenderContext::from_value(Some(value)),
      None => RenderContext::from_env(),
    }
  }

  /// Local collaborators rooted at `root` honouring the configured package layout.
  pub fn services(&self, root: &Path) -> BundleServices {
    let packages =
      BowerResolver::new(root).with_layout(&self.packages_dir, &self.package_manifest);
    BundleServices::local(root).with_packages(Arc::new(packages))
  }

  /// Build a registry holding every configured bundle.
  pub fn into_registry(self, root: &Path) -> Result<BundleRegistry> {
    let mut registry = BundleRegistry::new(self.services(root));

    for definition in self.bundles {
      let kind = definition.kind.ok_or_else(|| BundleError::MissingKind {
        name: definition.name.clone(),
      })?;
      let bundle = registry.create_bundle(definition.name, kind, definition.url);

      for include in definition.include {
        match include {
          IncludeDefinition::File { file } => bundle.add_file(file),
          IncludeDefinition::Glob { glob, ignore } => bundle.add_glob_ignoring(glob, ignore),
        };
      }
      if let Some(packages) = definition.packages {
        bundle.include_packages(packages.include_dev, packages.exclude);
      }
      bundle.rebase(
        definition
          .rebase
          .into_iter()
          .map(|rule| (rule.prefix, rule.replacement)),
      );
    }

    Ok(registry)
  }
}
