//! Fetch coordination for one archiving session
//!
//! The coordinator owns the session bookkeeping: the set of URLs already
//! requested, the in-flight counter, and the channel completions arrive on.
//! Transport I/O runs concurrently on spawned tasks, but completions are
//! consumed one at a time by the single owner of this struct, so all
//! bookkeeping mutation is naturally serialized.

use crate::archiver::fetcher::fetch_url;
use crate::extract::ResourceKind;
use crate::ArchiveError;
use reqwest::Client;
use std::collections::HashSet;
use tokio::sync::mpsc;
use url::Url;

/// One resolved fetch: the requested URL, the kind it was requested as,
/// and its outcome
pub(crate) struct FetchCompletion {
    pub url: Url,
    pub kind: ResourceKind,
    pub outcome: Result<Vec<u8>, ArchiveError>,
}

/// Ensures every URL of a session is fetched exactly once and signals when
/// all issued fetches have resolved
pub(crate) struct FetchCoordinator {
    client: Client,
    completions: mpsc::UnboundedSender<FetchCompletion>,
    inbox: mpsc::UnboundedReceiver<FetchCompletion>,
    requested: HashSet<Url>,
    in_flight: usize,
}

impl FetchCoordinator {
    pub fn new(client: Client) -> Self {
        let (completions, inbox) = mpsc::unbounded_channel();
        Self {
            client,
            completions,
            inbox,
            requested: HashSet::new(),
            in_flight: 0,
        }
    }

    /// Requests a fetch of `url`, tagged with `kind`
    ///
    /// Idempotent: a URL already requested this session is a silent no-op,
    /// no matter which extraction path discovered it. Otherwise the
    /// in-flight counter is incremented before this call returns and a GET
    /// is started on a background task.
    pub fn request(&mut self, url: Url, kind: ResourceKind) {
        if !self.requested.insert(url.clone()) {
            tracing::debug!("Skipping already requested URL: {}", url);
            return;
        }

        self.in_flight += 1;
        tracing::debug!("Requesting {} as {:?} ({} in flight)", url, kind, self.in_flight);

        let client = self.client.clone();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let outcome = fetch_url(&client, &url).await;
            // Cannot fail: the receiver lives as long as the coordinator,
            // and the coordinator outlives every counted fetch.
            let _ = completions.send(FetchCompletion { url, kind, outcome });
        });
    }

    /// Awaits the next completion; `None` once every issued request has
    /// produced its outcome
    ///
    /// The zero check happens at entry, strictly after the previous
    /// completion was handled and after any `request` calls that handling
    /// made. Resources discovered while processing one fetch are therefore
    /// counted in-flight before the barrier can fire.
    pub async fn next_completion(&mut self) -> Option<FetchCompletion> {
        if self.in_flight == 0 {
            return None;
        }

        let completion = self.inbox.recv().await?;
        self.in_flight -= 1;
        Some(completion)
    }

    /// Number of distinct URLs requested this session
    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_page(server: &MockServer, route: &str, body: &[u8]) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_duplicate_request_is_noop() {
        let server = MockServer::start().await;
        mock_page(&server, "/a.png", b"png").await;

        let url = Url::parse(&format!("{}/a.png", server.uri())).unwrap();
        let mut coordinator = FetchCoordinator::new(Client::new());

        coordinator.request(url.clone(), ResourceKind::Image);
        coordinator.request(url.clone(), ResourceKind::Image);
        coordinator.request(url, ResourceKind::Stylesheet);

        let mut completions = 0;
        while coordinator.next_completion().await.is_some() {
            completions += 1;
        }

        assert_eq!(completions, 1);
        assert_eq!(coordinator.requested_count(), 1);
    }

    #[tokio::test]
    async fn test_barrier_fires_only_at_zero() {
        let server = MockServer::start().await;
        mock_page(&server, "/one", b"1").await;
        mock_page(&server, "/two", b"2").await;
        mock_page(&server, "/three", b"3").await;

        let base = Url::parse(&server.uri()).unwrap();
        let mut coordinator = FetchCoordinator::new(Client::new());
        coordinator.request(base.join("/one").unwrap(), ResourceKind::Image);
        coordinator.request(base.join("/two").unwrap(), ResourceKind::Image);

        let mut seen = Vec::new();
        while let Some(completion) = coordinator.next_completion().await {
            // Discover more work while handling a completion, the way the
            // session does when a stylesheet references an image.
            if seen.is_empty() {
                coordinator.request(base.join("/three").unwrap(), ResourceKind::Image);
            }
            seen.push(completion.url.path().to_string());
        }

        assert_eq!(seen.len(), 3);
        assert!(coordinator.next_completion().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_session_completes_immediately() {
        let mut coordinator = FetchCoordinator::new(Client::new());
        assert!(coordinator.next_completion().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_still_resolves() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/gone", server.uri())).unwrap();
        let mut coordinator = FetchCoordinator::new(Client::new());
        coordinator.request(url, ResourceKind::Image);

        let completion = coordinator.next_completion().await.unwrap();
        assert!(completion.outcome.is_err());
        assert!(coordinator.next_completion().await.is_none());
    }
}
