//! Error types for configuration and call-site misuse.
//!
//! This module contains [`ConfigError`], the error returned whenever a
//! resource, client, or action invocation is set up incorrectly. These
//! errors are fatal and synchronous: they are reported at the point of
//! misuse and never retried.
//!
//! # Example
//!
//! ```rust
//! use wp_resource::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors caused by invalid configuration or invalid use of an action.
///
/// Every variant carries enough context to locate the offending template,
/// binding, or call site.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A URL template was empty.
    #[error("URL template cannot be empty.")]
    EmptyTemplate,

    /// A placeholder or binding used the reserved name `hasOwnProperty`.
    #[error("'{name}' is not a valid parameter name.")]
    ReservedParameterName {
        /// The rejected name.
        name: String,
    },

    /// A `@path` binding did not form a valid dotted path.
    #[error("Dotted member path '@{path}' is invalid.")]
    MalformedPath {
        /// The path as written, without the leading `@`.
        path: String,
    },

    /// An action was invoked with more positional arguments than it accepts.
    #[error("Expected up to {max} arguments for action '{action}', got {count} arguments.")]
    InvalidArgumentCount {
        /// The action that was invoked.
        action: String,
        /// The number of arguments received.
        count: usize,
        /// The maximum number of arguments the call form accepts.
        max: usize,
    },

    /// An argument had the wrong kind for its position.
    #[error("Argument {position} of action '{action}' must be {expected}.")]
    InvalidArgument {
        /// The action that was invoked.
        action: String,
        /// One-based position of the offending argument.
        position: usize,
        /// What was expected in that position.
        expected: &'static str,
    },

    /// No action with this name is registered on the resource.
    #[error("Unknown action '{action}'.")]
    UnknownAction {
        /// The requested action name.
        action: String,
    },

    /// An action was configured to send a body with a method that carries none.
    #[error("Action '{action}' cannot send a body with {method}.")]
    BodyNotAllowed {
        /// The misconfigured action.
        action: String,
        /// The HTTP method of the action.
        method: String,
    },

    /// An action was invoked outside of a Tokio runtime.
    #[error("Action '{action}' must be invoked from within a Tokio runtime.")]
    MissingRuntime {
        /// The action that was invoked.
        action: String,
    },

    /// The base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme (e.g., 'https://example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The REST API root path is invalid.
    #[error("Invalid API root '{root}'. Expected an absolute path such as '/wp-json'.")]
    InvalidApiRoot {
        /// The invalid root that was provided.
        root: String,
    },

    /// A nonce was empty.
    #[error("Nonce cannot be empty. Please provide the value issued by WordPress.")]
    EmptyNonce,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
