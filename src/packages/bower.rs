//! Resolver for packages installed in a bower-style `bower_components` tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::PackageResolver;

/// Directory holding installed packages, relative to the project root.
pub const DEFAULT_PACKAGES_DIR: &str = "bower_components";

/// Root manifest file name.
pub const DEFAULT_MANIFEST_FILE: &str = "bower.json";

/// Manifest files probed inside each installed package, in order.
const PACKAGE_MANIFESTS: [&str; 2] = [".bower.json", "bower.json"];

/// `main` may be a single path or a list of paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum MainFiles {
  One(String),
  Many(Vec<String>),
}

impl MainFiles {
  fn into_vec(self) -> Vec<String> {
    match self {
      Self::One(path) => vec![path],
      Self::Many(paths) => paths,
    }
  }
}

/// Fields of a manifest that influence resolution.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
  #[serde(default)]
  main: Option<MainFiles>,
  #[serde(default)]
  dependencies: BTreeMap<String, Value>,
  #[serde(default)]
  dev_dependencies: BTreeMap<String, Value>,
  #[serde(default)]
  overrides: BTreeMap<String, PackageOverride>,
}

/// Root-level replacement of a package's `main` and `dependencies`.
#[derive(Debug, Clone, Default, Deserialize)]
struct PackageOverride {
  #[serde(default)]
  main: Option<MainFiles>,
  #[serde(default)]
  dependencies: Option<BTreeMap<String, Value>>,
}

#[derive(Debug)]
struct InstalledPackage {
  main: Vec<String>,
  dependencies: BTreeSet<String>,
  excluded: bool,
}

impl InstalledPackage {
  fn excluded() -> Self {
    Self {
      main: Vec::new(),
      dependencies: BTreeSet::new(),
      excluded: true,
    }
  }
}

/// Reads the root manifest and the installed package manifests below `root`.
#[derive(Debug, Clone)]
pub struct BowerResolver {
  root: PathBuf,
  packages_dir: String,
  manifest_file: String,
}

impl BowerResolver {
  /// Resolver using the default `bower.json` and `bower_components` layout.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      packages_dir: DEFAULT_PACKAGES_DIR.into(),
      manifest_file: DEFAULT_MANIFEST_FILE.into(),
    }
  }

  /// Override the package directory and root manifest names.
  pub fn with_layout(
    mut self,
    packages_dir: impl Into<String>,
    manifest_file: impl Into<String>,
  ) -> Self {
    self.packages_dir = packages_dir.into();
    self.manifest_file = manifest_file.into();
    self
  }

  fn package_dir(&self, name: &str) -> PathBuf {
    self.root.join(&self.packages_dir).join(name)
  }

  fn load_package(
    &self,
    name: &str,
    overrides: &BTreeMap<String, PackageOverride>,
  ) -> Result<InstalledPackage> {
    let dir = self.package_dir(name);
    let manifest_path = PACKAGE_MANIFESTS
      .iter()
      .map(|file| dir.join(file))
      .find(|path| path.is_file())
      .ok_or_else(|| anyhow!("package `{name}` is not installed in {}", dir.display()))?;
    let manifest = read_manifest(&manifest_path)?;

    let override_entry = overrides.get(name).cloned().unwrap_or_default();
    let main = override_entry
      .main
      .or(manifest.main)
      .map(MainFiles::into_vec)
      .unwrap_or_default();
    let dependencies = override_entry
      .dependencies
      .unwrap_or(manifest.dependencies)
      .into_keys()
      .collect();

    Ok(InstalledPackage {
      main,
      dependencies,
      excluded: false,
    })
  }

  /// Load every package reachable from `roots`.
  ///
  /// Excluded packages stay in the graph as leaves so their dependents keep their place in
  /// the ordering, but they are neither read from disk nor traversed.
  fn collect_packages(
    &self,
    roots: BTreeSet<String>,
    overrides: &BTreeMap<String, PackageOverride>,
    excluded: &BTreeSet<String>,
  ) -> Result<BTreeMap<String, InstalledPackage>> {
    let mut packages = BTreeMap::new();
    let mut queue: Vec<String> = roots.into_iter().collect();

    while let Some(name) = queue.pop() {
      if packages.contains_key(&name) {
        continue;
      }
      if excluded.contains(&name) {
        packages.insert(name, InstalledPackage::excluded());
        continue;
      }
      let package = self.load_package(&name, overrides)?;
      queue.extend(package.dependencies.iter().cloned());
      packages.insert(name, package);
    }

    Ok(packages)
  }
}

impl PackageResolver for BowerResolver {
  fn resolve(
    &self,
    extension: &str,
    include_dev: bool,
    excluded: &BTreeSet<String>,
  ) -> Result<Vec<PathBuf>> {
    let manifest = read_manifest(&self.root.join(&self.manifest_file))?;

    let mut roots: BTreeSet<String> = manifest.dependencies.into_keys().collect();
    if include_dev {
      roots.extend(manifest.dev_dependencies.into_keys());
    }

    let packages = self.collect_packages(roots, &manifest.overrides, excluded)?;
    let order = dependency_order(&packages);

    let mut files = Vec::new();
    for name in order {
      let Some(package) = packages.get(&name).filter(|package| !package.excluded) else {
        continue;
      };
      let dir = self.package_dir(&name);
      files.extend(
        package
          .main
          .iter()
          .filter(|main| main.ends_with(extension))
          .map(|main| dir.join(main.trim_start_matches("./"))),
      );
    }

    tracing::debug!(extension, count = files.len(), "resolved package files");
    Ok(files)
  }
}

fn read_manifest(path: &Path) -> Result<Manifest> {
  let content =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Order packages so every dependency precedes its dependents.
///
/// Packages become ready once all of their dependencies are placed; ready packages are placed
/// in name order, one generation at a time. A cycle is broken by placing the alphabetically
/// first remaining package.
fn dependency_order(packages: &BTreeMap<String, InstalledPackage>) -> Vec<String> {
  let mut placed: BTreeSet<&str> = BTreeSet::new();
  let mut order = Vec::with_capacity(packages.len());

  while order.len() < packages.len() {
    let mut ready: Vec<&str> = packages
      .iter()
      .filter(|(name, _)| !placed.contains(name.as_str()))
      .filter(|(_, package)| {
        package
          .dependencies
          .iter()
          .all(|dependency| placed.contains(dependency.as_str()))
      })
      .map(|(name, _)| name.as_str())
      .collect();

    if ready.is_empty() {
      let Some(first) = packages
        .keys()
        .map(String::as_str)
        .find(|name| !placed.contains(name))
      else {
        break;
      };
      tracing::warn!(package = first, "dependency cycle detected, breaking at package");
      ready.push(first);
    }

    for name in ready {
      placed.insert(name);
      order.push(name.to_string());
    }
  }

  order
}
