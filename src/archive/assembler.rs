//! Archive assembly
//!
//! The assembler accumulates resource records as fetches complete and
//! builds the finished archive once the session barrier has fired.

use crate::archive::WebArchiveResource;

/// The finished archive: one main resource plus its subresources
///
/// Subresources carry pairwise-distinct URLs (guaranteed by session dedup)
/// and appear in completion order, which is not stable across runs.
#[derive(Debug, Clone)]
pub struct WebArchive {
    pub main_resource: WebArchiveResource,
    pub subresources: Vec<WebArchiveResource>,
}

/// Accumulates resource records for one archiving session
#[derive(Debug, Default)]
pub struct ArchiveAssembler {
    main_resource: Option<WebArchiveResource>,
    subresources: Vec<WebArchiveResource>,
}

impl ArchiveAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the main resource. Called at most once per session.
    pub fn set_main(&mut self, resource: WebArchiveResource) {
        self.main_resource = Some(resource);
    }

    /// Records a subresource as its fetch completes
    pub fn add_subresource(&mut self, resource: WebArchiveResource) {
        self.subresources.push(resource);
    }

    /// Number of subresources recorded so far
    pub fn subresource_count(&self) -> usize {
        self.subresources.len()
    }

    /// Builds the archive, or None when the main resource never arrived
    /// (a failed main fetch means there is nothing to emit)
    pub fn build(self) -> Option<WebArchive> {
        let main_resource = self.main_resource?;
        Some(WebArchive {
            main_resource,
            subresources: self.subresources,
        })
    }
}
