//! Canonical asset identities and the ordered merge that deduplicates them.
//!
//! Every raw path produced by pattern expansion or package resolution is reduced to the
//! directory and base name it would have without a `.min`/`.debug` marker. Two raw paths
//! sharing that identity are the same asset in different build variants, so only one of them
//! may occupy the resolution list.

use crate::variant::Variant;

/// Variant markers stripped when computing an identity.
const MARKERS: [&str; 2] = [".min", ".debug"];

/// Directory and base name of an asset with variant markers removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalIdentity {
  /// Directory portion using forward slashes, empty for bare file names and `/` for files
  /// at the filesystem root.
  pub directory: String,
  /// File name without variant marker or extension.
  pub base_name: String,
}

impl CanonicalIdentity {
  /// `directory/base_name`, or the bare base name when there is no directory.
  pub fn stem_path(&self) -> String {
    if self.directory.is_empty() {
      self.base_name.clone()
    } else if self.directory.ends_with('/') {
      format!("{}{}", self.directory, self.base_name)
    } else {
      format!("{}/{}", self.directory, self.base_name)
    }
  }
}

/// Entry held in the resolution list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
  /// Canonical identity of the asset.
  pub identity: CanonicalIdentity,
  /// Final extension including the leading dot, or empty.
  pub extension: String,
}

impl FileEntry {
  /// Canonicalize a raw path into an entry.
  pub fn from_raw(raw_path: &str) -> Self {
    let normalised = raw_path.replace('\\', "/");
    let (directory, file_name) = match normalised.rfind('/') {
      Some(0) => ("/", &normalised[1..]),
      Some(index) => (&normalised[..index], &normalised[index + 1..]),
      None => ("", normalised.as_str()),
    };

    let (mut stem, mut extension) = match file_name.rfind('.') {
      Some(index) if index > 0 => (&file_name[..index], &file_name[index..]),
      _ => (file_name, ""),
    };

    if MARKERS.contains(&extension) {
      // `name.min` with no real extension: the marker is the whole suffix.
      extension = "";
    } else if let Some(stripped) = MARKERS
      .iter()
      .find_map(|marker| stem.strip_suffix(marker))
      .filter(|stripped| !stripped.is_empty())
    {
      stem = stripped;
    }

    Self {
      identity: CanonicalIdentity {
        directory: directory.to_string(),
        base_name: stem.to_string(),
      },
      extension: extension.to_string(),
    }
  }

  /// On-disk path of this entry in the given variant.
  pub fn variant_path(&self, variant: Variant) -> String {
    format!(
      "{}{}{}",
      self.identity.stem_path(),
      variant.marker(),
      self.extension
    )
  }
}

/// Where a raw path came from, which decides how duplicates are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
  /// Explicit file declaration or package main file: re-declaration moves to the end.
  Explicit,
  /// Glob match: first match wins and later matches never reorder.
  Glob,
}

/// Ordered list of canonical entries built while resolving a bundle.
#[derive(Debug, Clone, Default)]
pub struct ResolutionList {
  entries: Vec<FileEntry>,
}

impl ResolutionList {
  /// Fold one raw path into the list.
  ///
  /// Two overlapping globs do not reorder each other even though two explicit declarations
  /// would.
  pub fn insert(&mut self, raw_path: &str, source: EntrySource) {
    let entry = FileEntry::from_raw(raw_path);
    let existing = self
      .entries
      .iter()
      .position(|candidate| candidate.identity == entry.identity);

    if let Some(index) = existing {
      if source == EntrySource::Glob {
        return;
      }
      self.entries.remove(index);
    }
    self.entries.push(entry);
  }

  /// Entries in resolution order.
  pub fn entries(&self) -> &[FileEntry] {
    &self.entries
  }

  /// Consume the list, yielding its entries in order.
  pub fn into_entries(self) -> Vec<FileEntry> {
    self.entries
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn stems(list: &ResolutionList) -> Vec<String> {
    list
      .entries()
      .iter()
      .map(|entry| entry.identity.stem_path())
      .collect()
  }

  #[test]
  fn strips_variant_markers_before_extension() {
    let entry = FileEntry::from_raw("assets/js/app.min.js");
    assert_eq!(entry.identity.directory, "assets/js");
    assert_eq!(entry.identity.base_name, "app");
    assert_eq!(entry.extension, ".js");

    let debug = FileEntry::from_raw("assets/js/app.debug.js");
    assert_eq!(debug, FileEntry::from_raw("assets/js/app.js"));
  }

  #[test]
  fn treats_bare_marker_suffix_as_variant() {
    let entry = FileEntry::from_raw("exists1.min");
    assert_eq!(entry.identity.base_name, "exists1");
    assert_eq!(entry.extension, "");
    assert_eq!(entry, FileEntry::from_raw("exists1.debug"));
  }

  #[test]
  fn keeps_dotfiles_and_windows_separators_sane() {
    let dotfile = FileEntry::from_raw(".eslintrc");
    assert_eq!(dotfile.identity.base_name, ".eslintrc");
    assert_eq!(dotfile.extension, "");

    let windows = FileEntry::from_raw("vendor\\lib.css");
    assert_eq!(windows.identity.directory, "vendor");
    assert_eq!(windows.variant_path(Variant::Minified), "vendor/lib.min.css");
  }

  #[test]
  fn keeps_filesystem_root_directory() {
    let entry = FileEntry::from_raw("/app.min.js");
    assert_eq!(entry.identity.directory, "/");
    assert_eq!(entry.identity.base_name, "app");
    assert_eq!(entry.variant_path(Variant::Plain), "/app.js");
    assert_eq!(entry.variant_path(Variant::Debug), "/app.debug.js");
  }

  #[test]
  fn builds_variant_paths() {
    let entry = FileEntry::from_raw("css/site.css");
    assert_eq!(entry.variant_path(Variant::Debug), "css/site.debug.css");
    assert_eq!(entry.variant_path(Variant::Plain), "css/site.css");
    assert_eq!(entry.variant_path(Variant::Minified), "css/site.min.css");
  }

  #[test]
  fn explicit_redeclaration_moves_to_end() {
    let mut list = ResolutionList::default();
    list.insert("a.js", EntrySource::Explicit);
    list.insert("b.js", EntrySource::Explicit);
    list.insert("a.min.js", EntrySource::Explicit);

    assert_eq!(stems(&list), vec!["b", "a"]);
  }

  #[test]
  fn glob_matches_never_reorder_or_duplicate() {
    let mut list = ResolutionList::default();
    for path in ["exists1", "exists2", "exists3", "exists4"] {
      list.insert(path, EntrySource::Glob);
    }
    for path in ["exists1", "exists2"] {
      list.insert(path, EntrySource::Glob);
    }

    assert_eq!(stems(&list), vec!["exists1", "exists2", "exists3", "exists4"]);
  }

  #[test]
  fn identity_ignores_extension() {
    let mut list = ResolutionList::default();
    list.insert("lib/app.css", EntrySource::Explicit);
    list.insert("lib/app.js", EntrySource::Glob);

    assert_eq!(list.entries().len(), 1);
    assert_eq!(list.entries()[0].extension, ".css");
  }
}
