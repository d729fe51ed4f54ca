//! Selection of the on-disk build variant for each canonical asset.

use crate::canonical::FileEntry;
use crate::environment::Environment;

/// Build variant of an asset, distinguished by a filename marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
  /// `name.debug.ext`
  Debug,
  /// `name.ext`
  Plain,
  /// `name.min.ext`
  Minified,
}

impl Variant {
  /// Marker inserted between base name and extension.
  pub fn marker(self) -> &'static str {
    match self {
      Self::Debug => ".debug",
      Self::Plain => "",
      Self::Minified => ".min",
    }
  }
}

/// Existence check used to pick a variant. Must answer `false` for missing paths.
pub trait FileProbe {
  /// Whether a file exists at `path`.
  fn exists(&self, path: &str) -> bool;
}

/// Pick the first variant of `entry` present on disk, in the environment's order.
pub fn resolve_variant<P>(
  entry: &FileEntry,
  environment: Environment,
  probe: &P,
) -> Option<String>
where
  P: FileProbe + ?Sized,
{
  environment
    .variant_order()
    .into_iter()
    .map(|variant| entry.variant_path(variant))
    .find(|candidate| probe.exists(candidate))
}

/// Resolve every entry, dropping those with no existing variant.
pub fn resolve_entries<P>(
  entries: &[FileEntry],
  environment: Environment,
  probe: &P,
) -> Vec<String>
where
  P: FileProbe + ?Sized,
{
  entries
    .iter()
    .filter_map(|entry| {
      let resolved = resolve_variant(entry, environment, probe);
      if resolved.is_none() {
        tracing::debug!(
          asset = %entry.identity.stem_path(),
          "no variant found on disk, dropping asset"
        );
      }
      resolved
    })
    .collect()
}
