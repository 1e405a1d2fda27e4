//! Archive resource records and MIME inference

use crate::extract::ResourceKind;
use url::Url;

/// A single fetched resource destined for the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebArchiveResource {
    /// The URL the resource was fetched from
    pub url: Url,

    /// The raw response bytes
    pub data: Vec<u8>,

    /// The inferred MIME type (never taken from response headers)
    pub mime_type: String,
}

impl WebArchiveResource {
    /// Creates a resource record, inferring the MIME type from the kind
    /// the resource was requested as
    pub fn new(url: Url, data: Vec<u8>, kind: ResourceKind) -> Self {
        let mime_type = infer_mime_type(kind, &url);
        Self { url, data, mime_type }
    }
}

/// Infers a MIME type from the resource kind and URL
///
/// Response headers are deliberately ignored; they are unreliable in
/// practice. Images take `image/<extension>` from the URL path, falling
/// back to `application/octet-stream` when the path has no extension.
pub fn infer_mime_type(kind: ResourceKind, url: &Url) -> String {
    match kind {
        ResourceKind::Document => "text/html".to_string(),
        ResourceKind::Stylesheet => "text/css".to_string(),
        ResourceKind::Script => "text/javascript".to_string(),
        ResourceKind::Image => match path_extension(url) {
            Some(extension) => format!("image/{}", extension),
            None => "application/octet-stream".to_string(),
        },
    }
}

/// Returns the lowercased extension of the URL path, if any
fn path_extension(url: &Url) -> Option<String> {
    let file_name = url.path().rsplit('/').next()?;
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}
