//! Environment configuration for the content API client.
//!
//! All environment reads happen in one place. [`ClientConfig::from_env`]
//! produces an immutable value that is handed to the client at
//! construction; a missing base URL only becomes an error when a
//! non-optional fetch actually needs it.

use url::Url;

use crate::error::ClientError;

/// Environment variable naming the backend origin.
pub const ENV_BASE_URL: &str = "NEOS_BASE_URL";

/// Environment variable naming the public-facing base URL, when the site
/// is served behind a proxy.
pub const ENV_PUBLIC_BASE_URL: &str = "PUBLIC_BASE_URL";

// ============================================================================
// Client Config
// ============================================================================

/// Immutable configuration for a [`crate::ContentClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Option<Url>,
    public_base_url: Option<Url>,
}

impl ClientConfig {
    /// Creates a config from explicit values.
    pub fn new(base_url: Option<Url>, public_base_url: Option<Url>) -> Self {
        Self {
            base_url,
            public_base_url,
        }
    }

    /// Reads `NEOS_BASE_URL` and `PUBLIC_BASE_URL` from the process
    /// environment.
    ///
    /// A variable that is set but not a valid URL is a configuration error;
    /// an unset or empty variable is simply absent.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_var(ENV_BASE_URL, lookup(ENV_BASE_URL))?,
            public_base_url: parse_var(ENV_PUBLIC_BASE_URL, lookup(ENV_PUBLIC_BASE_URL))?,
        })
    }

    /// Returns the backend origin, if configured.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Returns the public-facing base URL, if configured.
    pub fn public_base_url(&self) -> Option<&Url> {
        self.public_base_url.as_ref()
    }

    /// Returns the backend origin or a configuration error.
    pub fn require_base_url(&self) -> Result<&Url, ClientError> {
        self.base_url.as_ref().ok_or_else(|| {
            ClientError::Configuration(format!("{ENV_BASE_URL} is not configured"))
        })
    }
}

fn parse_var(name: &str, value: Option<String>) -> Result<Option<Url>, ClientError> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Url::parse(raw.trim())
            .map(Some)
            .map_err(|e| ClientError::Configuration(format!("{name} is not a valid URL: {e}"))),
        _ => Ok(None),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn test_both_urls_configured() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://cms.internal:8080"),
            (ENV_PUBLIC_BASE_URL, "https://www.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.base_url().unwrap().as_str(), "http://cms.internal:8080/");
        assert_eq!(
            config.public_base_url().unwrap().host_str(),
            Some("www.example.com")
        );
    }

    #[test]
    fn test_missing_base_url_is_not_a_load_error() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.base_url().is_none());
        assert!(matches!(
            config.require_base_url(),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[(ENV_BASE_URL, "  ")])).unwrap();
        assert!(config.base_url().is_none());
    }

    #[test]
    fn test_invalid_url_is_a_configuration_error() {
        let result = ClientConfig::from_lookup(lookup_from(&[(ENV_BASE_URL, "not a url")]));
        match result {
            Err(ClientError::Configuration(msg)) => assert!(msg.contains(ENV_BASE_URL)),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }
}
