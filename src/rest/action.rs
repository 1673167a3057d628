//! Action descriptors.
//!
//! An [`ActionDescriptor`] tells a resource how to perform one named action:
//! which HTTP method to use, which extra bindings apply, whether the response
//! is a list, and which hooks run around the request.
//!
//! # Example
//!
//! ```rust
//! use wp_resource::rest::{ActionDescriptor, ParamBindings};
//! use wp_resource::clients::HttpMethod;
//! use std::time::Duration;
//!
//! let update = ActionDescriptor::new(HttpMethod::Put)
//!     .params(ParamBindings::new().binding("id", "@id"))
//!     .header("X-HTTP-Method-Override", "PUT")
//!     .timeout(Duration::from_secs(5));
//!
//! assert!(update.has_body());
//! assert!(!update.is_array());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::{HttpMethod, HttpResponse, Timeout};
use crate::rest::entity::{Placeholder, Resolved};
use crate::rest::errors::ResourceError;
use crate::rest::params::ParamBindings;

/// Rewrites a request or response body. `None` means no body.
pub type TransformFn = Arc<dyn Fn(Option<Value>) -> Option<Value> + Send + Sync>;

/// Produces the resolved value of a successful action.
pub type ResponseInterceptor = Arc<dyn Fn(&Placeholder, &HttpResponse) -> Resolved + Send + Sync>;

/// Runs on failure; returning `Some` recovers the action with that value.
pub type ResponseErrorInterceptor = Arc<dyn Fn(&ResourceError) -> Option<Resolved> + Send + Sync>;

/// Configuration of a single named action.
#[derive(Clone)]
pub struct ActionDescriptor {
    pub(crate) method: HttpMethod,
    pub(crate) params: ParamBindings,
    pub(crate) url: Option<String>,
    pub(crate) is_array: bool,
    pub(crate) has_body: Option<bool>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) timeout: Option<Timeout>,
    pub(crate) cache: bool,
    pub(crate) transform_request: Option<TransformFn>,
    pub(crate) transform_response: Option<TransformFn>,
    pub(crate) interceptor: Option<ResponseInterceptor>,
    pub(crate) error_interceptor: Option<ResponseErrorInterceptor>,
}

impl ActionDescriptor {
    /// Creates a singular action using `method` and no extra bindings.
    #[must_use]
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            params: ParamBindings::new(),
            url: None,
            is_array: false,
            has_body: None,
            headers: HashMap::new(),
            timeout: None,
            cache: false,
            transform_request: None,
            transform_response: None,
            interceptor: None,
            error_interceptor: None,
        }
    }

    /// Sets bindings that apply to this action only.
    #[must_use]
    pub fn params(mut self, params: ParamBindings) -> Self {
        self.params = params;
        self
    }

    /// Uses `url` instead of the resource's template.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Declares whether the response is a list.
    #[must_use]
    pub const fn array(mut self, is_array: bool) -> Self {
        self.is_array = is_array;
        self
    }

    /// Overrides whether the action sends a body.
    ///
    /// Building a resource fails with [`ConfigError::BodyNotAllowed`](crate::ConfigError::BodyNotAllowed)
    /// if a GET or HEAD action is set to send one.
    #[must_use]
    pub const fn body(mut self, has_body: bool) -> Self {
        self.has_body = Some(has_body);
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets a deadline or cancellation signal for every request of this action.
    #[must_use]
    pub fn timeout(mut self, timeout: impl Into<Timeout>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    /// Allows GET responses to be served from the client's cache.
    #[must_use]
    pub const fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Rewrites the outgoing body.
    #[must_use]
    pub fn transform_request<F>(mut self, transform: F) -> Self
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.transform_request = Some(Arc::new(transform));
        self
    }

    /// Rewrites the incoming body before it is checked and merged.
    #[must_use]
    pub fn transform_response<F>(mut self, transform: F) -> Self
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.transform_response = Some(Arc::new(transform));
        self
    }

    /// Replaces the resolved value of successful calls.
    #[must_use]
    pub fn interceptor<F>(mut self, interceptor: F) -> Self
    where
        F: Fn(&Placeholder, &HttpResponse) -> Resolved + Send + Sync + 'static,
    {
        self.interceptor = Some(Arc::new(interceptor));
        self
    }

    /// Inspects failures and optionally recovers from them.
    #[must_use]
    pub fn error_interceptor<F>(mut self, interceptor: F) -> Self
    where
        F: Fn(&ResourceError) -> Option<Resolved> + Send + Sync + 'static,
    {
        self.error_interceptor = Some(Arc::new(interceptor));
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns `true` if the response is a list.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.is_array
    }

    /// Returns `true` if the action sends a body.
    ///
    /// POST, PUT and PATCH send one unless overridden.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        match self.has_body {
            Some(has_body) => has_body,
            None => self.method.has_body(),
        }
    }

    /// Returns the URL override, if any.
    #[must_use]
    pub fn url_override(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("method", &self.method)
            .field("params", &self.params)
            .field("url", &self.url)
            .field("is_array", &self.is_array)
            .field("has_body", &self.has_body)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("cache", &self.cache)
            .field("transform_request", &self.transform_request.is_some())
            .field("transform_response", &self.transform_response.is_some())
            .field("interceptor", &self.interceptor.is_some())
            .field("error_interceptor", &self.error_interceptor.is_some())
            .finish()
    }
}
