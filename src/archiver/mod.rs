//! Archiving session orchestration
//!
//! This module wires extraction, fetch coordination, and assembly into the
//! full traversal for one page:
//! 1. Fetch the main page; scan it for tag references and inline
//!    `url(...)` references; request everything discovered.
//! 2. Fetched stylesheets get one extra `url(...)` scan; the images found
//!    there are terminal. Images and scripts are never scanned.
//! 3. When the last outstanding fetch resolves, assemble and serialize.

mod coordinator;
mod fetcher;

use crate::archive::{ArchiveAssembler, WebArchive, WebArchiveResource};
use crate::archiver::coordinator::{FetchCompletion, FetchCoordinator};
use crate::archiver::fetcher::build_http_client;
use crate::config::HttpConfig;
use crate::extract::{extract_document_references, extract_style_references, ResourceKind};
use crate::output::{ArchiveSerializer, BinaryPlistSerializer};
use crate::ArchiveError;
use reqwest::Client;
use std::str::FromStr;
use url::Url;

/// A cookie applied to every request of an archiving session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl FromStr for SessionCookie {
    type Err = String;

    /// Parses the `name=value` form used on the command line
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
        if name.is_empty() {
            return Err(format!("cookie name missing in '{}'", s));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Options for one archiving call
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Cookies applied to every outgoing request
    pub cookies: Vec<SessionCookie>,

    /// Whether `<script src>` resources are collected
    pub include_javascript: bool,

    /// Bypass HTTP caches instead of using cache-first semantics
    pub skip_cache: bool,

    /// HTTP client settings
    pub http: HttpConfig,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            cookies: Vec::new(),
            include_javascript: true,
            skip_cache: false,
            http: HttpConfig::default(),
        }
    }
}

/// The outcome of one archiving call
///
/// `archive_data` is absent when the main resource could not be fetched or
/// the final encoding failed; `errors` holds one entry per failed URL plus
/// at most one encoding failure.
#[derive(Debug)]
pub struct ArchivingResult {
    pub archive_data: Option<Vec<u8>>,
    pub errors: Vec<ArchiveError>,
}

/// Archives `url` with the binary property-list encoding
///
/// The session completes only after every discovered resource has resolved,
/// successfully or not. Failures of individual subresources are recorded
/// and never abort the session.
pub async fn archive(url: Url, options: &ArchiveOptions) -> ArchivingResult {
    archive_with_serializer(url, options, &BinaryPlistSerializer).await
}

/// Archives `url`, encoding the result with a caller-supplied serializer
///
/// The serializer is scoped to this one call; no encoder state is shared
/// between sessions.
pub async fn archive_with_serializer(
    url: Url,
    options: &ArchiveOptions,
    serializer: &dyn ArchiveSerializer,
) -> ArchivingResult {
    if !matches!(url.scheme(), "http" | "https") {
        return ArchivingResult {
            archive_data: None,
            errors: vec![ArchiveError::UnsupportedUrl {
                url: url.to_string(),
            }],
        };
    }

    let client = match build_http_client(&options.http, &options.cookies, options.skip_cache, &url)
    {
        Ok(client) => client,
        Err(source) => {
            return ArchivingResult {
                archive_data: None,
                errors: vec![ArchiveError::Client(source)],
            }
        }
    };

    let session = ArchivingSession::new(client, options.include_javascript);
    let (archive, mut errors) = session.run(url).await;

    let archive_data = match archive {
        Some(archive) => match serializer.serialize(&archive) {
            Ok(data) => Some(data),
            Err(error) => {
                errors.push(ArchiveError::Encoding(error));
                None
            }
        },
        None => None,
    };

    ArchivingResult {
        archive_data,
        errors,
    }
}

/// State for one archiving session
///
/// Created per `archive` call, owned by the session loop, discarded once
/// the barrier has fired. Never shared or reused across calls.
struct ArchivingSession {
    coordinator: FetchCoordinator,
    assembler: ArchiveAssembler,
    errors: Vec<ArchiveError>,
    include_javascript: bool,
}

impl ArchivingSession {
    fn new(client: Client, include_javascript: bool) -> Self {
        Self {
            coordinator: FetchCoordinator::new(client),
            assembler: ArchiveAssembler::new(),
            errors: Vec::new(),
            include_javascript,
        }
    }

    /// Drives the traversal to the completion barrier
    async fn run(mut self, main_url: Url) -> (Option<WebArchive>, Vec<ArchiveError>) {
        tracing::info!("Archiving {}", main_url);
        self.coordinator.request(main_url, ResourceKind::Document);

        // One completion is handled to the end, including the requests its
        // handling schedules, before the next is taken from the channel.
        while let Some(completion) = self.coordinator.next_completion().await {
            self.handle_completion(completion);
        }

        tracing::info!(
            "Session complete: {} URLs requested, {} subresources, {} errors",
            self.coordinator.requested_count(),
            self.assembler.subresource_count(),
            self.errors.len()
        );

        (self.assembler.build(), self.errors)
    }

    fn handle_completion(&mut self, completion: FetchCompletion) {
        let FetchCompletion { url, kind, outcome } = completion;

        let data = match outcome {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!("{}", error);
                self.errors.push(error);
                return;
            }
        };

        match kind {
            ResourceKind::Document => self.handle_document(url, data),
            ResourceKind::Stylesheet => self.handle_stylesheet(url, data),
            ResourceKind::Image | ResourceKind::Script => {
                self.assembler
                    .add_subresource(WebArchiveResource::new(url, data, kind));
            }
        }
    }

    /// The main page: both extraction passes run against it
    fn handle_document(&mut self, url: Url, data: Vec<u8>) {
        let text = String::from_utf8_lossy(&data);

        // Inline-style safety net: url(...) in <style> blocks and style
        // attributes is invisible to the tag scan.
        for reference in extract_style_references(&text, &url) {
            self.coordinator.request(reference, ResourceKind::Image);
        }

        for (reference, kind) in extract_document_references(&text, &url, self.include_javascript)
        {
            self.coordinator.request(reference, kind);
        }

        self.assembler
            .set_main(WebArchiveResource::new(url, data, ResourceKind::Document));
    }

    /// A stylesheet: scan for image references, one recursion level only
    fn handle_stylesheet(&mut self, url: Url, data: Vec<u8>) {
        let text = String::from_utf8_lossy(&data);

        for reference in extract_style_references(&text, &url) {
            self.coordinator.request(reference, ResourceKind::Image);
        }

        self.assembler
            .add_subresource(WebArchiveResource::new(url, data, ResourceKind::Stylesheet));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_from_str() {
        let cookie: SessionCookie = "session=abc123".parse().unwrap();
        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
    }

    #[test]
    fn test_cookie_value_may_contain_equals() {
        let cookie: SessionCookie = "token=a=b".parse().unwrap();
        assert_eq!(cookie.value, "a=b");
    }

    #[test]
    fn test_cookie_without_separator_rejected() {
        assert!("not-a-cookie".parse::<SessionCookie>().is_err());
    }

    #[test]
    fn test_cookie_without_name_rejected() {
        assert!("=value".parse::<SessionCookie>().is_err());
    }

    #[test]
    fn test_default_options() {
        let options = ArchiveOptions::default();
        assert!(options.include_javascript);
        assert!(!options.skip_cache);
        assert!(options.cookies.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_scheme_rejected_without_session() {
        let url = Url::parse("ftp://example.com/page").unwrap();
        let result = archive(url, &ArchiveOptions::default()).await;

        assert!(result.archive_data.is_none());
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0],
            ArchiveError::UnsupportedUrl { .. }
        ));
    }
}
