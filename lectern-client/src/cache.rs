//! Render-scoped memoization for document fetches.
//!
//! One [`RenderCache`] lives for exactly one render pass: the rendering
//! layer constructs it when a request comes in, threads it through the
//! components that load content, and drops it when the response is done.
//! It is never shared across requests, so a stale entry cannot outlive the
//! render that produced it.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use tokio::sync::{Mutex, OnceCell};

use lectern_core::DocumentPayload;

use crate::client::{CONTEXT_NODE_PARAM, ContentClient, FetchOptions, RoutePath};
use crate::error::ClientError;

type Slot = Arc<OnceCell<Option<DocumentPayload>>>;

// ============================================================================
// Render Cache
// ============================================================================

/// Per-render memo for document and preview-document lookups.
///
/// Concurrent and repeated lookups for the same key share one outbound
/// request and its completed value. Only successful outcomes are retained;
/// a failed fetch leaves the slot empty so a later call may try again
/// within the same render. This is a deliberate departure from caching the
/// in-flight result failures included: errors propagate to every caller
/// either way, and an empty slot keeps a failed key from pinning its error
/// for the rest of the render.
#[derive(Debug, Default)]
pub struct RenderCache {
    documents: Mutex<HashMap<String, Slot>>,
    previews: Mutex<HashMap<String, Slot>>,
}

impl RenderCache {
    /// Creates an empty cache for one render pass.
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(map: &Mutex<HashMap<String, Slot>>, key: &str) -> Slot {
        let mut map = map.lock().await;
        map.entry(key.to_string()).or_default().clone()
    }
}

// ============================================================================
// Memoized Loaders
// ============================================================================

impl ContentClient {
    /// Memoized variant of [`ContentClient::fetch_document`].
    ///
    /// A `None` or empty route path short-circuits to `Ok(None)` without
    /// touching the cache, so absent routes never occupy a key.
    pub async fn cached_document(
        &self,
        cache: &RenderCache,
        route_path: Option<&str>,
        opts: &FetchOptions,
    ) -> Result<Option<DocumentPayload>, ClientError> {
        let Some(path) = route_path.filter(|p| !p.is_empty()) else {
            return Ok(None);
        };

        let slot = RenderCache::slot(&cache.documents, path).await;
        slot.get_or_try_init(|| self.fetch_document(RoutePath::Path(path.to_string()), opts))
            .await
            .cloned()
    }

    /// Memoized variant of [`ContentClient::fetch_preview_document`],
    /// keyed by context node path.
    pub async fn cached_preview_document(
        &self,
        cache: &RenderCache,
        context_path: Option<&str>,
        incoming: &HeaderMap,
    ) -> Result<Option<DocumentPayload>, ClientError> {
        let Some(context_path) = context_path.filter(|p| !p.is_empty()) else {
            return Ok(None);
        };

        let slot = RenderCache::slot(&cache.previews, context_path).await;
        slot.get_or_try_init(|| {
            let query = HashMap::from([(
                CONTEXT_NODE_PARAM.to_string(),
                context_path.to_string(),
            )]);
            async move { self.fetch_preview_document(&query, incoming).await }
        })
        .await
        .cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[tokio::test]
    async fn test_empty_identifiers_short_circuit() {
        let client = ContentClient::new(ClientConfig::new(None, None));
        let cache = RenderCache::new();
        let opts = FetchOptions::new();

        // No base URL is configured, so any real fetch would fail with a
        // configuration error; short-circuiting must win.
        assert!(
            client
                .cached_document(&cache, None, &opts)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            client
                .cached_document(&cache, Some(""), &opts)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            client
                .cached_preview_document(&cache, None, &HeaderMap::new())
                .await
                .unwrap()
                .is_none()
        );

        assert!(cache.documents.lock().await.is_empty());
        assert!(cache.previews.lock().await.is_empty());
    }
}
