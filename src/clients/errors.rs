//! HTTP-specific error types.
//!
//! This module contains error types for HTTP operations:
//!
//! - [`HttpResponseError`]: Non-2xx responses from the API
//! - [`InvalidHttpRequestError`]: Requests that fail validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use wp_resource::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {:?}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::TimedOut { after }) => println!("Gave up after {after:?}"),
//!     Err(HttpError::Cancelled) => println!("Cancelled"),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// WordPress reports errors either as `{"code": ..., "message": ...}` or as
/// an array of such objects. The first `message` becomes [`message`](Self::message)
/// and the first `code` becomes [`error_code`](Self::error_code). The raw
/// body and headers are preserved for callers that need more.
///
/// # Example
///
/// ```rust
/// use wp_resource::clients::HttpResponseError;
/// use std::collections::HashMap;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: "No route was found matching the URL and request method".to_string(),
///     error_code: Some("json_no_route".to_string()),
///     body: None,
///     headers: HashMap::new(),
/// };
///
/// assert!(error.to_string().contains("404"));
/// ```
#[derive(Debug, Clone, Error)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
    /// WordPress error code (e.g. `json_no_route`), if the body carried one.
    pub error_code: Option<String>,
    /// The parsed response body, if any.
    pub body: Option<serde_json::Value>,
    /// Response headers (lowercased names, multi-valued).
    pub headers: HashMap<String, Vec<String>>,
}

/// Error returned when a request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request path was empty.
    #[error("Cannot send a request without a path.")]
    EmptyPath,

    /// A body was attached to a method that does not carry one.
    #[error("Cannot send a body with {method}.")]
    BodyNotAllowed {
        /// The HTTP method the body was attached to.
        method: String,
    },

    /// A header name or value could not be encoded.
    #[error("Invalid header '{name}'.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The request ran past its deadline.
    #[error("Request timed out after {after:?}")]
    TimedOut {
        /// The deadline that elapsed.
        after: Duration,
    },

    /// The request's cancellation signal fired.
    #[error("Request was cancelled")]
    Cancelled,

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }
}
