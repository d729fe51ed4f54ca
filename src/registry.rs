//! Name → bundle lookup shared by templates.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use crate::bundle::{Bundle, BundleKind, BundleServices};

/// Owns every bundle created for a project.
///
/// Bundles are only ever added. Creating a bundle under an existing name replaces it.
#[derive(Debug)]
pub struct BundleRegistry {
  services: BundleServices,
  bundles: BTreeMap<String, Bundle>,
}

impl BundleRegistry {
  /// Empty registry whose bundles use `services`.
  pub fn new(services: BundleServices) -> Self {
    Self {
      services,
      bundles: BTreeMap::new(),
    }
  }

  /// Empty registry using local collaborators rooted at `root`.
  pub fn local(root: impl AsRef<Path>) -> Self {
    Self::new(BundleServices::local(root))
  }

  /// Create a bundle and return it for configuration.
  pub fn create_bundle(
    &mut self,
    name: impl Into<String>,
    kind: BundleKind,
    rendered_url: Option<String>,
  ) -> &mut Bundle {
    let name = name.into();
    tracing::debug!(bundle = %name, ?kind, "creating bundle");
    let bundle = Bundle::new(kind, rendered_url, self.services.clone());
    match self.bundles.entry(name) {
      Entry::Occupied(mut entry) => {
        entry.insert(bundle);
        entry.into_mut()
      }
      Entry::Vacant(entry) => entry.insert(bundle),
    }
  }

  /// Every bundle by name.
  pub fn bundles(&self) -> &BTreeMap<String, Bundle> {
    &self.bundles
  }

  /// Look up a bundle.
  pub fn get(&self, name: &str) -> Option<&Bundle> {
    self.bundles.get(name)
  }

  /// Look up a bundle for further configuration.
  pub fn get_mut(&mut self, name: &str) -> Option<&mut Bundle> {
    self.bundles.get_mut(name)
  }
}
