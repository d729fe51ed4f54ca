//! Named collections of style or script assets and their rendering.
//!
//! A [`Bundle`] records include patterns, optional third-party package inclusion and rebase
//! rules. Nothing touches the filesystem until the bundle is resolved or rendered for a
//! [`RenderContext`], so the same bundle can be rendered for development and production.

pub mod render;

use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use md5::{Digest, Md5};
use serde::Deserialize;

use crate::canonical::{EntrySource, FileEntry, ResolutionList};
use crate::environment::RenderContext;
use crate::error::Result;
use crate::expand::expand_into;
use crate::fs::{AssetFiles, LocalFileSystem};
use crate::minify::{Minifier, ScriptMinifier, StyleMinifier};
use crate::packages::{BowerResolver, PackageInclusion, PackageResolver};
use crate::pattern::{Pattern, PatternRegistry};
use crate::rebase::RebaseMap;
use crate::variant::resolve_entries;

/// Content carried by a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
  /// Stylesheets rendered as `<link>` tags.
  Style,
  /// Scripts rendered as `<script>` tags.
  Script,
}

impl BundleKind {
  /// Extension used to filter third-party package files.
  pub fn extension(self) -> &'static str {
    match self {
      Self::Style => ".css",
      Self::Script => ".js",
    }
  }
}

/// Collaborators a bundle calls out to while resolving and rendering.
#[derive(Clone)]
pub struct BundleServices {
  /// Glob expansion, existence checks and path mapping.
  pub files: Arc<dyn AssetFiles>,
  /// Third-party package resolver.
  pub packages: Arc<dyn PackageResolver>,
  /// Minifier for style bundles.
  pub style_minifier: Arc<dyn Minifier>,
  /// Minifier for script bundles.
  pub script_minifier: Arc<dyn Minifier>,
}

impl BundleServices {
  /// Local collaborators rooted at `root`: filesystem globbing, bower packages and the
  /// built-in minifiers.
  pub fn local(root: impl AsRef<Path>) -> Self {
    let root = root.as_ref();
    Self {
      files: Arc::new(LocalFileSystem::new(root)),
      packages: Arc::new(BowerResolver::new(root)),
      style_minifier: Arc::new(StyleMinifier),
      script_minifier: Arc::new(ScriptMinifier),
    }
  }

  /// Replace the package resolver.
  pub fn with_packages(mut self, packages: Arc<dyn PackageResolver>) -> Self {
    self.packages = packages;
    self
  }

  fn minifier(&self, kind: BundleKind) -> &dyn Minifier {
    match kind {
      BundleKind::Style => self.style_minifier.as_ref(),
      BundleKind::Script => self.script_minifier.as_ref(),
    }
  }
}

impl fmt::Debug for BundleServices {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BundleServices").finish_non_exhaustive()
  }
}

/// Minified production artifact and its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifiedBundle {
  /// Minified, concatenated content of every resolved file.
  pub content: String,
  /// Hex md5 digest of `content`.
  pub etag: String,
}

impl MinifiedBundle {
  fn new(content: String) -> Self {
    let etag = hex::encode(Md5::digest(content.as_bytes()));
    Self { content, etag }
  }
}

/// Ordered collection of style or script assets rendered as one logical include.
#[derive(Debug)]
pub struct Bundle {
  kind: BundleKind,
  rendered_url: Option<String>,
  patterns: PatternRegistry,
  packages: Option<PackageInclusion>,
  rebase: RebaseMap,
  services: BundleServices,
  minified: OnceCell<MinifiedBundle>,
}

impl Bundle {
  /// Create an empty bundle. `rendered_url` is the production URL of the pre-built artifact.
  pub fn new(kind: BundleKind, rendered_url: Option<String>, services: BundleServices) -> Self {
    Self {
      kind,
      rendered_url,
      patterns: PatternRegistry::default(),
      packages: None,
      rebase: RebaseMap::default(),
      services,
      minified: OnceCell::new(),
    }
  }

  /// Content kind of the bundle.
  pub fn kind(&self) -> BundleKind {
    self.kind
  }

  /// URL rendered in production, if configured.
  pub fn rendered_url(&self) -> Option<&str> {
    self.rendered_url.as_deref()
  }

  /// Registered include patterns.
  pub fn patterns(&self) -> &PatternRegistry {
    &self.patterns
  }

  /// Package inclusion settings, when packages are included.
  pub fn package_inclusion(&self) -> Option<&PackageInclusion> {
    self.packages.as_ref()
  }

  /// Include one file. Ignored when a pattern with the same text is already registered.
  pub fn add_file(&mut self, path: impl Into<String>) -> &mut Self {
    self.patterns.push(Pattern::File(path.into()));
    self
  }

  /// Include every file matched by a glob.
  pub fn add_glob(&mut self, pattern: impl Into<String>) -> &mut Self {
    self.add_glob_ignoring(pattern, Vec::<String>::new())
  }

  /// Include every file matched by a glob except those matched by an `ignore` pattern.
  pub fn add_glob_ignoring<I, S>(&mut self, pattern: impl Into<String>, ignore: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.patterns.push(Pattern::Glob {
      pattern: pattern.into(),
      ignore: ignore.into_iter().map(Into::into).collect(),
    });
    self
  }

  /// Merge third-party package main files after every registered pattern.
  pub fn include_packages<I, S>(&mut self, include_dev: bool, excluded: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.packages = Some(PackageInclusion::new(include_dev, excluded));
    self
  }

  /// Add prefix → replacement rules applied to development output paths.
  pub fn rebase<I, K, V>(&mut self, rules: I) -> &mut Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.rebase.extend(rules);
    self
  }

  /// Canonical entries in resolution order, before variant selection.
  pub fn resolve_entries(&self) -> Result<Vec<FileEntry>> {
    let mut list = ResolutionList::default();
    expand_into(&self.patterns, self.services.files.as_ref(), &mut list)?;

    if let Some(inclusion) = &self.packages {
      let package_files = self.services.packages.resolve(
        self.kind.extension(),
        inclusion.include_dev,
        &inclusion.excluded,
      )?;
      tracing::debug!(count = package_files.len(), "merging package files");
      for path in package_files {
        let relative = self.services.files.relativize(&path);
        list.insert(&relative, EntrySource::Explicit);
      }
    }

    Ok(list.into_entries())
  }

  /// Existing asset paths in resolution order, with variants chosen for `ctx`.
  pub fn resolved_files(&self, ctx: &RenderContext) -> Result<Vec<String>> {
    let entries = self.resolve_entries()?;
    Ok(resolve_entries(
      &entries,
      ctx.environment,
      self.services.files.as_ref(),
    ))
  }

  /// Minified artifact, computed on first access and cached for the bundle's lifetime.
  ///
  /// Later calls return the cached value whatever `ctx` they pass; build a new bundle when
  /// sources change.
  pub fn minified(&self, ctx: &RenderContext) -> Result<&MinifiedBundle> {
    if let Some(minified) = self.minified.get() {
      return Ok(minified);
    }

    let paths: Vec<PathBuf> = self
      .resolved_files(ctx)?
      .iter()
      .map(|path| self.services.files.locate(path))
      .collect();
    let content = self.services.minifier(self.kind).minify(&paths)?;
    tracing::debug!(files = paths.len(), bytes = content.len(), "minified bundle");

    Ok(self.minified.get_or_init(|| MinifiedBundle::new(content)))
  }

  /// Minified content of the whole bundle.
  pub fn minified_content(&self, ctx: &RenderContext) -> Result<&str> {
    Ok(&self.minified(ctx)?.content)
  }

  /// Hex md5 digest of the minified content.
  pub fn etag(&self, ctx: &RenderContext) -> Result<&str> {
    Ok(&self.minified(ctx)?.etag)
  }

  /// HTML include markup for `ctx`.
  ///
  /// Development emits one tag per resolved, rebased file. Production emits a single tag for
  /// the rendered URL tagged with the content hash.
  pub fn render(&self, ctx: &RenderContext) -> Result<String> {
    if ctx.is_production() {
      if self.rendered_url.is_none() {
        tracing::warn!("rendering production bundle without a rendered url");
      }
      let url = render::hashed_url(self.rendered_url.as_deref(), self.etag(ctx)?);
      return Ok(render::include_tag(self.kind, &url));
    }

    Ok(
      self
        .resolved_files(ctx)?
        .iter()
        .map(|path| render::include_tag(self.kind, &self.rebase.apply(path)))
        .collect(),
    )
  }
}
