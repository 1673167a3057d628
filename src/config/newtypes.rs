//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated base URL for the WordPress site.
///
/// The URL must carry an alphabetic scheme and a non-empty host. Trailing
/// slashes are dropped so paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use wp_resource::BaseUrl;
///
/// let url = BaseUrl::new("https://blog.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://blog.example.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), Some("blog.example.com"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidBaseUrl { url: url.clone() });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidBaseUrl { url: url.clone() });
        }

        // Bracketed IPv6 hosts contain colons, so they end at the closing bracket.
        let remainder = &url[host_start..];
        let host_end = if remainder.starts_with('[') {
            remainder
                .find(']')
                .map(|i| host_start + i + 1)
                .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?
        } else {
            remainder
                .find([':', '/', '?', '#'])
                .map_or(url.len(), |i| host_start + i)
        };

        if host_end == host_start {
            return Err(ConfigError::InvalidBaseUrl { url: url.clone() });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        let host = &self.url[self.host_start..self.host_end];
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }

    /// Joins a path or absolute URL onto this base.
    ///
    /// Absolute `http(s)://` URLs are returned unchanged; anything else is
    /// appended with exactly one `/` separator.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// The path under which the WordPress REST API is mounted.
///
/// Must be absolute. A trailing slash is dropped; the root `/` is kept.
///
/// # Example
///
/// ```rust
/// use wp_resource::ApiRoot;
///
/// let root = ApiRoot::new("/wordpress/wp-json/").unwrap();
/// assert_eq!(root.as_ref(), "/wordpress/wp-json");
/// assert_eq!(root.endpoint("posts/"), "/wordpress/wp-json/posts/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRoot(String);

impl ApiRoot {
    /// The mount point used by the site this crate was built for.
    pub const DEFAULT: &'static str = "/wordpress/wp-json";

    /// Creates a new validated API root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiRoot`] if the root is not an absolute path.
    pub fn new(root: impl Into<String>) -> Result<Self, ConfigError> {
        let root = root.into();
        let trimmed = root.trim();
        if !trimmed.starts_with('/') || trimmed.contains(['?', '#', ' ']) {
            return Err(ConfigError::InvalidApiRoot { root });
        }
        let normalized = trimmed.trim_end_matches('/');
        Ok(Self(if normalized.is_empty() {
            String::new()
        } else {
            normalized.to_string()
        }))
    }

    /// Returns the URL template for an endpoint under this root.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl Default for ApiRoot {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl AsRef<str> for ApiRoot {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A WordPress REST nonce sent as `X-WP-Nonce` for cookie authentication.
///
/// # Security
///
/// The `Debug` implementation masks the value, displaying only
/// `Nonce(*****)`.
///
/// # Example
///
/// ```rust
/// use wp_resource::Nonce;
///
/// let nonce = Nonce::new("a1b2c3").unwrap();
/// assert_eq!(format!("{:?}", nonce), "Nonce(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Creates a new nonce.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyNonce`] if the value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ConfigError::EmptyNonce);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Nonce {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nonce(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_accepts_https() {
        let url = BaseUrl::new("https://blog.example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), Some("blog.example.com"));
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let url = BaseUrl::new("http://localhost:8080/").unwrap();
        assert_eq!(url.as_ref(), "http://localhost:8080");
        assert_eq!(url.host_name(), Some("localhost"));
    }

    #[test]
    fn test_base_url_accepts_ipv6_host() {
        let url = BaseUrl::new("http://[::1]:8080").unwrap();
        assert_eq!(url.host_name(), Some("[::1]"));
    }

    #[test]
    fn test_base_url_rejects_missing_scheme() {
        assert!(matches!(
            BaseUrl::new("blog.example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_base_url_rejects_empty_host() {
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("https:///path").is_err());
    }

    #[test]
    fn test_base_url_join() {
        let url = BaseUrl::new("https://blog.example.com").unwrap();
        assert_eq!(
            url.join("/wordpress/wp-json/posts"),
            "https://blog.example.com/wordpress/wp-json/posts"
        );
        assert_eq!(
            url.join("https://cdn.example.com/x.json"),
            "https://cdn.example.com/x.json"
        );
    }

    #[test]
    fn test_api_root_requires_leading_slash() {
        assert!(matches!(
            ApiRoot::new("wp-json"),
            Err(ConfigError::InvalidApiRoot { .. })
        ));
    }

    #[test]
    fn test_api_root_default_and_endpoint() {
        let root = ApiRoot::default();
        assert_eq!(root.as_ref(), "/wordpress/wp-json");
        assert_eq!(root.endpoint("users/me"), "/wordpress/wp-json/users/me");
    }

    #[test]
    fn test_api_root_slash_only() {
        let root = ApiRoot::new("/").unwrap();
        assert_eq!(root.endpoint("posts"), "/posts");
    }

    #[test]
    fn test_nonce_masks_debug_output() {
        let nonce = Nonce::new("secret-nonce").unwrap();
        assert_eq!(format!("{nonce:?}"), "Nonce(*****)");
        assert_eq!(nonce.as_ref(), "secret-nonce");
    }

    #[test]
    fn test_nonce_rejects_empty() {
        assert!(matches!(Nonce::new(""), Err(ConfigError::EmptyNonce)));
    }
}
