//! Content API client: URL construction, dispatch, response handling.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, HeaderMap};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use lectern_core::{DocumentPayload, SitePayload};

use crate::config::{ClientConfig, ENV_BASE_URL};
use crate::error::{ClientError, normalize_api_error};
use crate::headers::{forwarded_headers, preview_headers};

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for Lectern.
const USER_AGENT: &str = concat!("Lectern/", env!("CARGO_PKG_VERSION"));

/// Document endpoint path.
pub const DOCUMENT_ENDPOINT: &str = "/neos/content-api/document";

/// Site endpoint path.
pub const SITE_ENDPOINT: &str = "/neos/content-api/site";

/// Query parameter carrying the context node path in preview requests.
pub const CONTEXT_NODE_PARAM: &str = "node[__contextNodePath]";

// ============================================================================
// Request Options
// ============================================================================

/// Cache behavior requested for a fetch.
///
/// The transport has no browser-style fetch cache, so the mode travels as a
/// request `Cache-Control` header for intermediaries to honor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// No cache directive; intermediaries use their defaults.
    Default,
    /// Revalidate before reuse.
    NoCache,
    /// Never cache. The default: rendered content tracks the backend.
    #[default]
    NoStore,
}

impl CacheMode {
    /// Returns the `Cache-Control` request header value, if any.
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::NoCache => Some("no-cache"),
            Self::NoStore => Some("no-store"),
        }
    }
}

/// Options for a single fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// When set, a missing base URL yields `Ok(None)` instead of a
    /// configuration error.
    pub optional: bool,
    /// Requested cache behavior.
    pub cache: CacheMode,
}

impl FetchOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the fetch as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the cache mode.
    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }
}

// ============================================================================
// Route Path
// ============================================================================

/// A document route, either a complete path or its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePath {
    /// A complete path, used verbatim.
    Path(String),
    /// Path segments, joined with `/` behind a leading `/`.
    Segments(Vec<String>),
}

impl RoutePath {
    /// Resolves the route to the path string sent to the backend.
    pub fn resolve(&self) -> String {
        match self {
            Self::Path(path) => path.clone(),
            Self::Segments(segments) => format!("/{}", segments.join("/")),
        }
    }
}

impl From<&str> for RoutePath {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for RoutePath {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<String>> for RoutePath {
    fn from(segments: Vec<String>) -> Self {
        Self::Segments(segments)
    }
}

impl From<&[&str]> for RoutePath {
    fn from(segments: &[&str]) -> Self {
        Self::Segments(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

// ============================================================================
// Content Client
// ============================================================================

/// HTTP client for the content API.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ContentClient {
    /// Creates a client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built. This should only occur
    /// if the system's TLS/SSL configuration is fundamentally broken,
    /// making network operations impossible. This is considered
    /// unrecoverable at runtime.
    pub fn new(config: ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to create HTTP client: {}. \
                    This usually indicates a broken TLS/SSL configuration.",
                    e
                )
            });

        Self { http, config }
    }

    /// Creates a client configured from the process environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the document behind a route.
    ///
    /// Returns `Ok(None)` when the backend answers 404, or when no base URL
    /// is configured and the fetch is optional.
    #[instrument(skip(self, opts), fields(route = %route.resolve()))]
    pub async fn fetch_document(
        &self,
        route: RoutePath,
        opts: &FetchOptions,
    ) -> Result<Option<DocumentPayload>, ClientError> {
        let Some(base) = self.config.base_url() else {
            if opts.optional {
                debug!("{ENV_BASE_URL} not configured, skipping optional fetch");
                return Ok(None);
            }
            return Err(ClientError::Configuration(format!(
                "{ENV_BASE_URL} is not configured"
            )));
        };

        let url = endpoint_url(base, DOCUMENT_ENDPOINT, Some(("path", &route.resolve())));
        let headers = forwarded_headers(&self.config);
        let response = self.dispatch(url, headers, opts.cache).await?;

        Self::read_document(response).await
    }

    /// Fetches a draft document by its context node path, forwarding the
    /// visitor's session so the backend can resolve unpublished content.
    ///
    /// `query` is the raw query-parameter map of the preview request; it
    /// must contain a `node[__contextNodePath]` entry. Preview responses
    /// are never cached.
    #[instrument(skip_all)]
    pub async fn fetch_preview_document(
        &self,
        query: &HashMap<String, String>,
        incoming: &HeaderMap,
    ) -> Result<Option<DocumentPayload>, ClientError> {
        let Some(context_path) = query.get(CONTEXT_NODE_PARAM) else {
            return Err(ClientError::Input(format!(
                "missing query parameter {CONTEXT_NODE_PARAM}"
            )));
        };

        let base = self.config.require_base_url()?;
        let url = endpoint_url(base, DOCUMENT_ENDPOINT, Some(("contextPath", context_path)));
        let headers = preview_headers(&self.config, incoming);
        let response = self.dispatch(url, headers, CacheMode::NoStore).await?;

        Self::read_document(response).await
    }

    /// Fetches the site record.
    ///
    /// Unlike the document loaders, any non-2xx status is an error here; a
    /// site that cannot be loaded leaves nothing to render.
    #[instrument(skip(self, opts))]
    pub async fn fetch_site(&self, opts: &FetchOptions) -> Result<Option<SitePayload>, ClientError> {
        let Some(base) = self.config.base_url() else {
            if opts.optional {
                debug!("{ENV_BASE_URL} not configured, skipping optional fetch");
                return Ok(None);
            }
            return Err(ClientError::Configuration(format!(
                "{ENV_BASE_URL} is not configured"
            )));
        };

        let url = endpoint_url(base, SITE_ENDPOINT, None);
        let headers = forwarded_headers(&self.config);
        let response = self.dispatch(url, headers, opts.cache).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(Some(read_json(response).await?))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn dispatch(
        &self,
        url: Url,
        headers: HeaderMap,
        cache: CacheMode,
    ) -> Result<Response, ClientError> {
        debug!(url = %url, "GET request");

        let mut request = self.http.get(url).headers(headers);
        if let Some(value) = cache.header_value() {
            request = request.header(CACHE_CONTROL, value);
        }

        let response = request.send().await?;
        debug!(status = %response.status(), "response received");
        Ok(response)
    }

    /// Shared 404/non-2xx handling for the two document loaders.
    async fn read_document(response: Response) -> Result<Option<DocumentPayload>, ClientError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("document not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(Some(read_json(response).await?))
    }

    async fn api_error(response: Response) -> ClientError {
        let status = response.status();
        let url = response.url().to_string();
        // Best-effort body read; an unreadable body normalizes as empty.
        let body = response.text().await.unwrap_or_default();
        normalize_api_error(status, &url, &body)
    }
}

fn endpoint_url(base: &Url, endpoint: &str, query: Option<(&str, &str)>) -> Url {
    let mut url = base.clone();
    url.set_path(endpoint);
    url.set_query(None);
    if let Some((name, value)) = query {
        url.query_pairs_mut().append_pair(name, value);
    }
    url
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.text().await?;
    debug!(len = body.len(), "decoding response body");
    serde_json::from_str(&body).map_err(ClientError::from)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_path_from_segments() {
        let route = RoutePath::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(route.resolve(), "/a/b");
    }

    #[test]
    fn test_route_path_from_string_is_verbatim() {
        let route = RoutePath::from("/features/text");
        assert_eq!(route.resolve(), "/features/text");
    }

    #[test]
    fn test_empty_segments_resolve_to_root() {
        let route = RoutePath::Segments(vec![]);
        assert_eq!(route.resolve(), "/");
    }

    #[test]
    fn test_document_url_encodes_path_query() {
        let base = Url::parse("http://cms.local").unwrap();
        let url = endpoint_url(&base, DOCUMENT_ENDPOINT, Some(("path", "/a/b")));
        assert_eq!(
            url.as_str(),
            "http://cms.local/neos/content-api/document?path=%2Fa%2Fb"
        );
    }

    #[test]
    fn test_site_url_has_no_query() {
        let base = Url::parse("http://cms.local:8080").unwrap();
        let url = endpoint_url(&base, SITE_ENDPOINT, None);
        assert_eq!(url.as_str(), "http://cms.local:8080/neos/content-api/site");
    }

    #[test]
    fn test_cache_mode_header_values() {
        assert_eq!(CacheMode::Default.header_value(), None);
        assert_eq!(CacheMode::NoCache.header_value(), Some("no-cache"));
        assert_eq!(CacheMode::NoStore.header_value(), Some("no-store"));
        assert_eq!(CacheMode::default(), CacheMode::NoStore);
    }

    #[test]
    fn test_fetch_options_builder() {
        let opts = FetchOptions::new().optional().cache(CacheMode::Default);
        assert!(opts.optional);
        assert_eq!(opts.cache, CacheMode::Default);
    }
}
