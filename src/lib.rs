//! Webarc: a single-page web archiver
//!
//! This crate fetches a web page together with every static resource it
//! references (images, stylesheets, scripts, and images referenced from
//! those stylesheets) and bundles everything into a `.webarchive` binary
//! property-list document usable for offline rendering.

pub mod archive;
pub mod archiver;
pub mod config;
pub mod extract;
pub mod output;

use thiserror::Error;
use url::Url;

/// Main error type for archiving operations
///
/// Per-URL fetch failures are accumulated in the session result rather than
/// aborting the session; the remaining variants occur at most once per call.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unsupported URL scheme: {url}")]
    UnsupportedUrl { url: String },

    #[error("failed to load {url}: {source}")]
    RequestFailed { url: Url, source: reqwest::Error },

    #[error("unexpected HTTP status {status} for {url}")]
    BadStatus { url: Url, status: u16 },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to encode archive: {0}")]
    Encoding(#[from] output::OutputError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ArchiveError {
    /// The URL this error concerns, when it is tied to a single resource
    pub fn resource_url(&self) -> Option<&Url> {
        match self {
            Self::RequestFailed { url, .. } | Self::BadStatus { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for archiving operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use archive::{ArchiveAssembler, WebArchive, WebArchiveResource};
pub use archiver::{
    archive, archive_with_serializer, ArchiveOptions, ArchivingResult, SessionCookie,
};
pub use config::{Config, HttpConfig};
pub use extract::{extract_document_references, extract_style_references, ResourceKind};
pub use output::{ArchiveSerializer, BinaryPlistSerializer};
