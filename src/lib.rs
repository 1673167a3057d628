//! # wp-resource
//!
//! Parametrized REST resources for WordPress-backed content sites.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe client configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the site URL, API root, and nonce
//! - An async HTTP client with per-request timeouts, cancellation, and an optional GET cache
//! - A resource factory: URL templates with `:param` placeholders, parameter
//!   bindings, and named actions that fill placeholders in place
//! - The WordPress endpoints a content site consumes, with typed models
//!
//! ## Quick Start
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
//!
//! ## Defining a Resource
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wp_resource::{ClientConfig, BaseUrl, HttpClient};
//! use wp_resource::rest::{Resource, ParamBindings};
//! use serde_json::json;
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://blog.example.com")?)
//!     .build()?;
//! let client = Arc::new(HttpClient::new(&config)?);
//!
//! let cards = Resource::builder(client, "/user/:userId/card/:cardId")
//!     .param_defaults(ParamBindings::new().literal("userId", 123).binding("cardId", "@id"))
//!     .build()?;
//!
//! // Returns immediately; the entity fills in when the response arrives.
//! let card = cards.get(json!({"cardId": 456}))?.into_entity().unwrap();
//! card.promise().unwrap().await?;
//! println!("{:?}", card.get("number"));
//! ```
//!
//! ## WordPress Endpoints
//!
//! ```rust,ignore
//! use wp_resource::rest::resources::{WordPress, Post};
//! use serde_json::json;
//!
//! let wordpress = WordPress::new(client, config.api_root())?;
//! let news = wordpress.posts().query(json!({"postType": "news"}))?;
//! news.promise().unwrap().await?;
//! let posts: Vec<Post> = news.as_collection().unwrap().deserialize()?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Defaults are passed explicitly through [`rest::ResourceOptions`]
//! - **Fail-fast validation**: Templates, bindings, and newtypes validate on construction
//! - **Thread-safe**: Placeholders are `Send + Sync` handles readable while they fill
//! - **Async-first**: Requests run as Tokio tasks; no automatic retries

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{ApiRoot, BaseUrl, ClientConfig, ClientConfigBuilder, Nonce};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    CancelSignal, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, HttpResponseError, InvalidHttpRequestError, PaginationInfo, Timeout,
};

// Re-export resource types
pub use rest::{
    ActionArg, ActionDescriptor, Callback, Collection, Entity, InFlight, Outcome, ParamBindings,
    Placeholder, Resolved, Resource, ResourceError, ResourceOptions, UrlTemplate,
};
