//! Reference extraction for webarc
//!
//! This module provides the pure scanning functions that discover fetchable
//! resource references in HTML documents and style text. No side effects,
//! no network.

mod document;
mod style;

// Re-export main functions
pub use document::extract_document_references;
pub use style::extract_style_references;

/// Classification of a discovered resource reference
///
/// The kind is attached when a fetch is requested and drives both MIME
/// inference and whether the fetched bytes get scanned for further
/// references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// The main page being archived
    Document,
    /// An image reference (`<img src>` or a `url(...)` occurrence)
    Image,
    /// A stylesheet reference (`<link rel="stylesheet">`)
    Stylesheet,
    /// A script reference (`<script src>`)
    Script,
}

