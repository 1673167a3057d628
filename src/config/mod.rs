//! Configuration types for the WordPress REST client.
//!
//! This module provides the configuration used to construct an
//! [`HttpClient`](crate::clients::HttpClient) and, through it, every
//! resource built on top of that client.
//!
//! # Overview
//!
//! - [`ClientConfig`]: The main configuration struct
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: A validated site URL
//! - [`ApiRoot`]: The path the REST API is mounted under
//! - [`Nonce`]: A masked `X-WP-Nonce` value for cookie authentication
//!
//! # Example
//!
//! ```rust
//! use wp_resource::{ClientConfig, BaseUrl, ApiRoot};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://blog.example.com").unwrap())
//!     .api_root(ApiRoot::new("/wordpress/wp-json").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{ApiRoot, BaseUrl, Nonce};

use std::collections::HashMap;

use crate::error::ConfigError;

/// Configuration for talking to a WordPress site.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use wp_resource::{ClientConfig, BaseUrl, Nonce};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://blog.example.com").unwrap())
///     .nonce(Nonce::new("a1b2c3").unwrap())
///     .user_agent_prefix("Frontend/2.1")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.api_root().as_ref(), "/wordpress/wp-json");
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    api_root: ApiRoot,
    nonce: Option<Nonce>,
    user_agent_prefix: Option<String>,
    default_headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the site base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the REST API root.
    #[must_use]
    pub const fn api_root(&self) -> &ApiRoot {
        &self.api_root
    }

    /// Returns the nonce, if configured.
    #[must_use]
    pub const fn nonce(&self) -> Option<&Nonce> {
        self.nonce.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the extra headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `base_url` is required. Defaults:
///
/// - `api_root`: [`ApiRoot::DEFAULT`]
/// - `nonce`: `None`
/// - `user_agent_prefix`: `None`
/// - `default_headers`: empty
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    api_root: Option<ApiRoot>,
    nonce: Option<Nonce>,
    user_agent_prefix: Option<String>,
    default_headers: HashMap<String, String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the site base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the REST API root.
    #[must_use]
    pub fn api_root(mut self, root: ApiRoot) -> Self {
        self.api_root = Some(root);
        self
    }

    /// Sets the nonce sent as `X-WP-Nonce`.
    #[must_use]
    pub fn nonce(mut self, nonce: Nonce) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        Ok(ClientConfig {
            base_url,
            api_root: self.api_root.unwrap_or_default(),
            nonce: self.nonce,
            user_agent_prefix: self.user_agent_prefix,
            default_headers: self.default_headers,
        })
    }
}
