//! HTTP fetching for archiving sessions
//!
//! This module builds the session's HTTP client (user agent, timeouts,
//! cookie set, cache policy) and performs the individual GET requests.
//! Cookies and cache policy are fixed at client construction and apply
//! identically to every request of a session.

use crate::archiver::SessionCookie;
use crate::config::HttpConfig;
use crate::ArchiveError;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client for one archiving session
///
/// With `skip_cache` set, every request carries `Cache-Control: no-cache`
/// and `Pragma: no-cache` so intermediaries revalidate instead of serving
/// cached copies. Cookies are installed in the client's jar for the origin
/// being archived.
pub(crate) fn build_http_client(
    http: &HttpConfig,
    cookies: &[SessionCookie],
    skip_cache: bool,
    url: &Url,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if skip_cache {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    }

    let jar = Jar::default();
    for cookie in cookies {
        jar.add_cookie_str(&format!("{}={}", cookie.name, cookie.value), url);
    }

    Client::builder()
        .user_agent(http.user_agent.clone())
        .timeout(Duration::from_secs(http.timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .default_headers(headers)
        .cookie_provider(Arc::new(jar))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one URL, returning its body bytes
///
/// Transport failures and non-success statuses both count as that URL's
/// fetch failure; there are no retries.
pub(crate) async fn fetch_url(client: &Client, url: &Url) -> Result<Vec<u8>, ArchiveError> {
    let response = client.get(url.clone()).send().await.map_err(|source| {
        ArchiveError::RequestFailed {
            url: url.clone(),
            source,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ArchiveError::BadStatus {
            url: url.clone(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|source| ArchiveError::RequestFailed {
        url: url.clone(),
        source,
    })?;

    Ok(body.to_vec())
}
