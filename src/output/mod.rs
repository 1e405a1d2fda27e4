//! Output encoding for webarc
//!
//! This module defines the serializer interface that turns an assembled
//! archive into its final byte encoding, plus the binary property-list
//! implementation consumed by WebKit offline viewers.

mod plist_output;

pub use plist_output::BinaryPlistSerializer;

use crate::archive::WebArchive;
use thiserror::Error;

/// Errors that can occur while encoding an archive
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("property list encoding failed: {0}")]
    Plist(#[from] plist::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for archive serializers
///
/// A serializer instance is constructed per archiving call and passed by
/// reference into the session; implementations hold no cross-session state.
pub trait ArchiveSerializer {
    /// Encodes the archive into its final byte representation
    fn serialize(&self, archive: &WebArchive) -> OutputResult<Vec<u8>>;
}
