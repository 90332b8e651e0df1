//! Outbound header construction.
//!
//! The backend sits behind the rendering layer and needs the
//! `X-Forwarded-*` trio to reconstruct public-facing URLs, plus the
//! visitor's cookie in preview mode so it can resolve the editing session.
//! Everything here is pure header-map construction; no I/O.

use reqwest::header::{COOKIE, HOST, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::config::ClientConfig;

/// `X-Forwarded-Host` header name.
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

/// `X-Forwarded-Port` header name.
pub const X_FORWARDED_PORT: HeaderName = HeaderName::from_static("x-forwarded-port");

/// `X-Forwarded-Proto` header name.
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

// ============================================================================
// Header Builders
// ============================================================================

/// Builds outbound headers for non-preview fetches.
///
/// With a configured public base URL the forwarded trio is derived from it;
/// without one the map is empty and the backend falls back to whatever the
/// transport reports.
pub fn forwarded_headers(config: &ClientConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(public) = config.public_base_url() {
        apply_public_base(&mut headers, public);
    }
    headers
}

/// Builds outbound headers for preview fetches.
///
/// The incoming request's cookie is always forwarded (empty when absent).
/// The forwarded trio comes from the configured public base URL when there
/// is one; otherwise it is derived from the incoming `Host` header:
///
/// - `host:port` forwards that host and port, without a protocol
/// - a bare host consults the incoming `X-Forwarded-Proto` to pick 443 or
///   80 and propagates the protocol (defaulting to `http`)
/// - no `Host` header at all forwards only the cookie
pub fn preview_headers(config: &ClientConfig, incoming: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let cookie = incoming
        .get(COOKIE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(""));
    headers.insert(COOKIE, cookie);

    if let Some(public) = config.public_base_url() {
        apply_public_base(&mut headers, public);
        return headers;
    }

    let Some(host) = incoming.get(HOST).and_then(|v| v.to_str().ok()) else {
        return headers;
    };

    match host.split_once(':') {
        Some((hostname, port)) => {
            set(&mut headers, X_FORWARDED_HOST, hostname);
            set(&mut headers, X_FORWARDED_PORT, port);
        }
        None => {
            let proto = incoming
                .get(X_FORWARDED_PROTO)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("http");
            let port = if proto == "https" { "443" } else { "80" };
            set(&mut headers, X_FORWARDED_HOST, host);
            set(&mut headers, X_FORWARDED_PORT, port);
            set(&mut headers, X_FORWARDED_PROTO, proto);
        }
    }

    headers
}

fn apply_public_base(headers: &mut HeaderMap, url: &Url) {
    let Some(hostname) = url.host_str() else {
        return;
    };

    let port = url
        .port()
        .unwrap_or(if url.scheme() == "https" { 443 } else { 80 });

    set(headers, X_FORWARDED_HOST, hostname);
    set(headers, X_FORWARDED_PORT, &port.to_string());
    set(headers, X_FORWARDED_PROTO, url.scheme());
}

// Values derived from a parsed URL or an already-validated incoming header
// are valid header values; anything else is dropped rather than panicking.
fn set(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_public(url: &str) -> ClientConfig {
        ClientConfig::new(None, Some(Url::parse(url).unwrap()))
    }

    fn bare_config() -> ClientConfig {
        ClientConfig::new(None, None)
    }

    fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
        headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_public_base_with_explicit_port() {
        let headers = forwarded_headers(&config_with_public("https://www.example.com:8443"));
        assert_eq!(header_str(&headers, &X_FORWARDED_HOST), Some("www.example.com"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PORT), Some("8443"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PROTO), Some("https"));
    }

    #[test]
    fn test_public_base_default_ports() {
        let headers = forwarded_headers(&config_with_public("https://www.example.com"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PORT), Some("443"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PROTO), Some("https"));

        let headers = forwarded_headers(&config_with_public("http://www.example.com"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PORT), Some("80"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PROTO), Some("http"));
    }

    #[test]
    fn test_no_public_base_means_no_forwarded_headers() {
        let headers = forwarded_headers(&bare_config());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_preview_forwards_cookie_even_when_absent() {
        let headers = preview_headers(&bare_config(), &HeaderMap::new());
        assert_eq!(header_str(&headers, &COOKIE), Some(""));
    }

    #[test]
    fn test_preview_host_with_port() {
        let mut incoming = HeaderMap::new();
        incoming.insert(HOST, HeaderValue::from_static("example.com:8443"));
        incoming.insert(COOKIE, HeaderValue::from_static("session=abc"));

        let headers = preview_headers(&bare_config(), &incoming);
        assert_eq!(header_str(&headers, &COOKIE), Some("session=abc"));
        assert_eq!(header_str(&headers, &X_FORWARDED_HOST), Some("example.com"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PORT), Some("8443"));
        assert!(headers.get(&X_FORWARDED_PROTO).is_none());
    }

    #[test]
    fn test_preview_bare_host_uses_incoming_proto() {
        let mut incoming = HeaderMap::new();
        incoming.insert(HOST, HeaderValue::from_static("example.com"));
        incoming.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));

        let headers = preview_headers(&bare_config(), &incoming);
        assert_eq!(header_str(&headers, &X_FORWARDED_HOST), Some("example.com"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PORT), Some("443"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PROTO), Some("https"));
    }

    #[test]
    fn test_preview_bare_host_defaults_to_http() {
        let mut incoming = HeaderMap::new();
        incoming.insert(HOST, HeaderValue::from_static("example.com"));

        let headers = preview_headers(&bare_config(), &incoming);
        assert_eq!(header_str(&headers, &X_FORWARDED_PORT), Some("80"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PROTO), Some("http"));
    }

    #[test]
    fn test_preview_without_host_forwards_only_cookie() {
        let mut incoming = HeaderMap::new();
        incoming.insert(COOKIE, HeaderValue::from_static("session=abc"));

        let headers = preview_headers(&bare_config(), &incoming);
        assert_eq!(headers.len(), 1);
        assert_eq!(header_str(&headers, &COOKIE), Some("session=abc"));
    }

    #[test]
    fn test_public_base_overrides_incoming_host_but_keeps_cookie() {
        let mut incoming = HeaderMap::new();
        incoming.insert(HOST, HeaderValue::from_static("internal:3000"));
        incoming.insert(COOKIE, HeaderValue::from_static("session=abc"));

        let config = config_with_public("https://www.example.com");
        let headers = preview_headers(&config, &incoming);
        assert_eq!(header_str(&headers, &COOKIE), Some("session=abc"));
        assert_eq!(header_str(&headers, &X_FORWARDED_HOST), Some("www.example.com"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PORT), Some("443"));
        assert_eq!(header_str(&headers, &X_FORWARDED_PROTO), Some("https"));
    }
}
