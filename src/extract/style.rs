//! `url(...)` reference extraction from style text
//!
//! Stylesheets and inline `<style>` blocks reference images through CSS
//! `url(...)` tokens that the tag scan never sees. This module scans raw
//! text for those tokens; it is applied both to fetched stylesheets and to
//! the main document's own bytes.

use crate::extract::document::resolve_reference;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// Accepts url('x'), url("x") and bare url(x), with optional inner padding.
static URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*['"]?([^'"()\s]+)['"]?\s*\)"#).unwrap());

/// Extracts `url(...)` references from style-bearing text
///
/// Matches are resolved against `base_url`. References using the inline
/// `data:` scheme are excluded (they are not independently fetchable), and
/// malformed references are dropped silently. The returned sequence may
/// contain duplicates; callers dedup by URL.
///
/// # Example
///
/// ```
/// use url::Url;
/// use webarc::extract::extract_style_references;
///
/// let css = "body { background-image: url('img/bg.png'); }";
/// let base = Url::parse("https://example.com/css/").unwrap();
/// let refs = extract_style_references(css, &base);
///
/// assert_eq!(refs, vec![Url::parse("https://example.com/css/img/bg.png").unwrap()]);
/// ```
pub fn extract_style_references(text: &str, base_url: &Url) -> Vec<Url> {
    URL_TOKEN
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .filter_map(|token| resolve_reference(token.as_str(), base_url))
        .collect()
}
