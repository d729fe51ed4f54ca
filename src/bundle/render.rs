//! HTML include tags emitted for bundles.

use super::BundleKind;

/// Stylesheet include tag.
pub fn style_tag(href: &str) -> String {
  format!(r#"<link rel="stylesheet" type="text/css" href="{href}" />"#)
}

/// Script include tag.
pub fn script_tag(src: &str) -> String {
  format!(r#"<script src="{src}"></script>"#)
}

/// Include tag matching the bundle's content kind.
pub fn include_tag(kind: BundleKind, url: &str) -> String {
  match kind {
    BundleKind::Style => style_tag(url),
    BundleKind::Script => script_tag(url),
  }
}

/// Production URL carrying the content hash as a cache-busting `etag` parameter.
///
/// An absent URL is not validated and renders as an empty path in front of the query.
pub fn hashed_url(rendered_url: Option<&str>, etag: &str) -> String {
  format!("{}?etag={etag}", rendered_url.unwrap_or_default())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_style_and_script_tags() {
    assert_eq!(
      include_tag(BundleKind::Style, "a.css"),
      r#"<link rel="stylesheet" type="text/css" href="a.css" />"#
    );
    assert_eq!(
      include_tag(BundleKind::Script, "a.js"),
      r#"<script src="a.js"></script>"#
    );
  }

  #[test]
  fn appends_etag_query() {
    assert_eq!(hashed_url(Some("/foo/bar.css"), "abc"), "/foo/bar.css?etag=abc");
    assert_eq!(hashed_url(None, "abc"), "?etag=abc");
  }
}
