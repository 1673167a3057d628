//! HTTP transport for the WordPress REST API.
//!
//! This module provides the transport layer resources are built on. It
//! turns an [`HttpRequest`] into an [`HttpResponse`] and knows nothing about
//! URL templates or entities.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client
//! - [`HttpRequest`]: A request to be sent
//! - [`HttpResponse`]: A parsed response, with [`PaginationInfo`]
//! - [`HttpMethod`]: Supported HTTP methods
//! - [`Timeout`] and [`CancelSignal`]: Per-request deadlines and cancellation
//! - [`HttpError`]: Transport failures
//!
//! # Example
//!
//! ```rust,ignore
//! use wp_resource::clients::{HttpClient, HttpRequest, HttpMethod};
//! use std::time::Duration;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/wordpress/wp-json/posts")
//!     .query_param("type", "page")
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let response = client.request(request).await?;
//! println!("{} posts in total", response.pagination.total.unwrap_or(0));
//! ```

mod cancel;
mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use cancel::{CancelSignal, Timeout};
pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, PaginationInfo};
