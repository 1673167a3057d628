//! Error types for settled resource actions.
//!
//! A [`ResourceError`] travels through the asynchronous error channel of an
//! action: the error callback, the response-error interceptor, and every
//! awaiter of the [`InFlight`](crate::rest::InFlight) handle. Misuse caught
//! before a request is sent is a [`ConfigError`](crate::ConfigError) instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use wp_resource::rest::ResourceError;
//!
//! match posts.query(params)?.promise().unwrap().await {
//!     Ok(resolved) => println!("Loaded {:?}", resolved),
//!     Err(ResourceError::ResponseShapeMismatch { action, expected, actual }) => {
//!         println!("{action}: wanted {expected}, got {actual}");
//!     }
//!     Err(ResourceError::Http(e)) => println!("Transport failure: {e}"),
//!     Err(ResourceError::Aborted) => println!("Request task ended early"),
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::clients::HttpError;

/// The top-level JSON shape of a response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// A JSON array.
    Array,
    /// Anything that is not an array.
    Object,
}

impl Shape {
    /// Returns the shape of a JSON value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        if value.is_array() {
            Self::Array
        } else {
            Self::Object
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Array => "array",
            Self::Object => "object",
        })
    }
}

/// Error type for resource actions.
///
/// Cloneable so that one failure can reach every awaiter of an action.
#[derive(Debug, Clone, Error)]
pub enum ResourceError {
    /// The response body did not match the action's `is_array` setting.
    ///
    /// The placeholder keeps the data it had before the call.
    #[error("Expected response to contain an {expected} but got an {actual} for action '{action}'.")]
    ResponseShapeMismatch {
        /// The action that was invoked.
        action: String,
        /// The shape the action declares.
        expected: Shape,
        /// The shape that arrived.
        actual: Shape,
    },

    /// The request failed in transport or the server answered with non-2xx.
    #[error(transparent)]
    Http(Arc<HttpError>),

    /// The request task ended without settling, e.g. during runtime shutdown.
    #[error("Action ended before it settled.")]
    Aborted,
}

impl ResourceError {
    /// Returns the HTTP status code if the server answered with an error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

impl From<HttpError> for ResourceError {
    fn from(error: HttpError) -> Self {
        Self::Http(Arc::new(error))
    }
}
