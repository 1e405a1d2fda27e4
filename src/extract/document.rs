//! Tag-based reference extraction from HTML documents
//!
//! This module scans a parsed HTML document for the static resources it
//! references:
//! - `<img src="...">` → image
//! - `<link rel="stylesheet" href="...">` → stylesheet
//! - `<script src="...">` → script (only when scripts are requested)

use crate::extract::ResourceKind;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").unwrap());
static STYLESHEET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel="stylesheet"][href]"#).unwrap());
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[src]").unwrap());

/// Extracts resource references from an HTML document
///
/// Each discovered reference is resolved against `base_url`; malformed or
/// non-fetchable references are dropped silently. A URL referenced by more
/// than one tag keeps the kind of the last tag scanned.
///
/// # Example
///
/// ```
/// use url::Url;
/// use webarc::extract::{extract_document_references, ResourceKind};
///
/// let html = r#"<html><body><img src="img/logo.png"></body></html>"#;
/// let base = Url::parse("https://example.com/page/").unwrap();
/// let refs = extract_document_references(html, &base, true);
///
/// let expected = Url::parse("https://example.com/page/img/logo.png").unwrap();
/// assert_eq!(refs.get(&expected), Some(&ResourceKind::Image));
/// ```
pub fn extract_document_references(
    html: &str,
    base_url: &Url,
    include_scripts: bool,
) -> HashMap<Url, ResourceKind> {
    let document = Html::parse_document(html);
    let mut references = HashMap::new();

    collect(&document, &IMG_SELECTOR, "src", ResourceKind::Image, base_url, &mut references);
    collect(
        &document,
        &STYLESHEET_SELECTOR,
        "href",
        ResourceKind::Stylesheet,
        base_url,
        &mut references,
    );
    if include_scripts {
        collect(&document, &SCRIPT_SELECTOR, "src", ResourceKind::Script, base_url, &mut references);
    }

    references
}

/// Collects references matching one selector into the map
fn collect(
    document: &Html,
    selector: &Selector,
    attribute: &str,
    kind: ResourceKind,
    base_url: &Url,
    references: &mut HashMap<Url, ResourceKind>,
) {
    for element in document.select(selector) {
        if let Some(value) = element.value().attr(attribute) {
            if let Some(resolved) = resolve_reference(value, base_url) {
                references.insert(resolved, kind);
            }
        }
    }
}

/// Resolves a reference to an absolute URL and validates it
///
/// Returns None for references that are not independently fetchable:
/// - empty or fragment-only references
/// - `javascript:`, `mailto:`, `tel:` pseudo-links
/// - inline `data:` URIs
/// - references that do not resolve to http(s)
pub(crate) fn resolve_reference(reference: &str, base_url: &Url) -> Option<Url> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    if reference.starts_with("javascript:")
        || reference.starts_with("mailto:")
        || reference.starts_with("tel:")
        || reference.starts_with("data:")
    {
        return None;
    }

    match base_url.join(reference) {
        Ok(mut absolute) if matches!(absolute.scheme(), "http" | "https") => {
            // Fragments never reach the wire; keeping them would defeat
            // dedup by URL.
            absolute.set_fragment(None);
            Some(absolute)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page/").unwrap()
    }

    fn extract(html: &str) -> HashMap<Url, ResourceKind> {
        extract_document_references(html, &base_url(), true)
    }

    #[test]
    fn test_extract_image() {
        let refs = extract(r#"<html><body><img src="img/logo.png"></body></html>"#);
        let expected = Url::parse("https://example.com/page/img/logo.png").unwrap();
        assert_eq!(refs.get(&expected), Some(&ResourceKind::Image));
    }

    #[test]
    fn test_extract_stylesheet() {
        let refs = extract(r#"<html><head><link rel="stylesheet" href="/main.css"></head></html>"#);
        let expected = Url::parse("https://example.com/main.css").unwrap();
        assert_eq!(refs.get(&expected), Some(&ResourceKind::Stylesheet));
    }

    #[test]
    fn test_extract_script() {
        let refs = extract(r#"<html><head><script src="app.js"></script></head></html>"#);
        let expected = Url::parse("https://example.com/page/app.js").unwrap();
        assert_eq!(refs.get(&expected), Some(&ResourceKind::Script));
    }

    #[test]
    fn test_scripts_excluded_when_disabled() {
        let html = r#"<html><head><script src="app.js"></script></head></html>"#;
        let refs = extract_document_references(html, &base_url(), false);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_non_stylesheet_link_ignored() {
        let refs = extract(r#"<html><head><link rel="canonical" href="/other"></head></html>"#);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_absolute_reference_kept_verbatim() {
        let refs = extract(r#"<img src="https://cdn.example.net/a.png">"#);
        let expected = Url::parse("https://cdn.example.net/a.png").unwrap();
        assert_eq!(refs.get(&expected), Some(&ResourceKind::Image));
    }

    #[test]
    fn test_relative_resolution() {
        let refs = extract(r#"<img src="img/logo.png">"#);
        assert!(refs.contains_key(&Url::parse("https://example.com/page/img/logo.png").unwrap()));
    }

    #[test]
    fn test_data_uri_dropped() {
        let refs = extract(r#"<img src="data:image/png;base64,AAAA">"#);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_empty_and_fragment_dropped() {
        let refs = extract(r##"<img src=""><img src="#top">"##);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_duplicate_reference_collapses() {
        let refs = extract(r#"<img src="a.png"><img src="a.png">"#);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_fragment_stripped_from_reference() {
        let refs = extract(r##"<img src="a.png#detail"><img src="a.png">"##);
        assert_eq!(refs.len(), 1);
        assert!(refs.contains_key(&Url::parse("https://example.com/page/a.png").unwrap()));
    }

    #[test]
    fn test_mixed_document() {
        let html = r#"
            <html>
            <head>
                <link rel="stylesheet" href="style.css">
                <script src="app.js"></script>
            </head>
            <body>
                <img src="one.png">
                <img src="two.gif">
            </body>
            </html>
        "#;
        let refs = extract(html);
        assert_eq!(refs.len(), 4);
        assert_eq!(
            refs.values().filter(|k| **k == ResourceKind::Image).count(),
            2
        );
    }
}
