// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Lectern Client
//!
//! HTTP data-access layer for a headless CMS content API.
//!
//! The rendering pipeline of a web application calls into this crate to
//! fetch documents, draft previews, and the site record, forwarding the
//! headers the backend needs to construct correct absolute URLs and to
//! resolve editor sessions.
//!
//! ## Modules
//!
//! - [`config`] - environment configuration (`NEOS_BASE_URL`,
//!   `PUBLIC_BASE_URL`), read once and passed around as a value
//! - [`headers`] - pure construction of `X-Forwarded-*` and `Cookie`
//!   headers for normal and preview fetches
//! - [`client`] - [`ContentClient`] with the three fetch operations
//! - [`cache`] - [`RenderCache`], per-render memoization of document loads
//! - [`error`] - [`ClientError`] and non-2xx response normalization
//!
//! ## Example
//!
//! ```ignore
//! use lectern_client::{ContentClient, FetchOptions, RenderCache};
//!
//! let client = ContentClient::from_env()?;
//!
//! // One cache per render pass.
//! let cache = RenderCache::new();
//! let opts = FetchOptions::new();
//!
//! let document = client
//!     .cached_document(&cache, Some("/features/text"), &opts)
//!     .await?;
//! ```
//!
//! There are no retries and no recovery in this layer; every failure
//! surfaces immediately to the rendering layer, which owns presentation.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;

pub use cache::RenderCache;
pub use client::{
    CONTEXT_NODE_PARAM, CacheMode, ContentClient, DOCUMENT_ENDPOINT, FetchOptions, RoutePath,
    SITE_ENDPOINT,
};
pub use config::{ClientConfig, ENV_BASE_URL, ENV_PUBLIC_BASE_URL};
pub use error::{API_ERRORS_MESSAGE, API_UNEXPECTED_MESSAGE, ClientError};
pub use headers::{
    X_FORWARDED_HOST, X_FORWARDED_PORT, X_FORWARDED_PROTO, forwarded_headers, preview_headers,
};
