//! Parametrized REST resources.
//!
//! This module provides the resource factory and everything it is built from:
//!
//! - **[`UrlTemplate`]**: `:name` placeholders, encoding, and query extraction
//! - **[`ParamBindings`]**: Literal, producer, and `@dotted.path` bindings
//! - **[`ActionDescriptor`]**: Method, list flag, hooks, and timeout of one action
//! - **[`Resource`]**: The factory and dispatcher for named actions
//! - **[`Entity`] / [`Collection`]**: Placeholders filled in place
//! - **[`InFlight`]**: An awaitable handle to an action's outcome
//! - **[`ResourceError`]**: Failures delivered through the error channel
//!
//! # Overview
//!
//! A resource is built once from a URL template, default bindings, and a set
//! of actions (`get`, `save`, `query`, `remove`, `delete`, plus any custom
//! ones). Each invocation returns a placeholder synchronously; the request
//! runs on the Tokio runtime and fills the placeholder when it settles.
//!
//! # Example
//!
//! ```rust,ignore
//! use wp_resource::rest::{Resource, ParamBindings, ActionArg, Callback};
//! use serde_json::json;
//!
//! let cards = Resource::builder(client, "/user/:userId/card/:cardId")
//!     .param_defaults(ParamBindings::new().literal("userId", 123).binding("cardId", "@id"))
//!     .build()?;
//!
//! // GET /user/123/card/456
//! let card = cards.get(json!({"cardId": 456}))?;
//!
//! // Callbacks run after the placeholder is filled
//! let all = cards.call("query", vec![
//!     ActionArg::Data(json!({})),
//!     ActionArg::Callback(Callback::on_success(|value, _| println!("{:?}", value))),
//! ])?;
//!
//! // Or await the handle
//! let resolved = card.promise().unwrap().await?;
//! ```
//!
//! # Key Types
//!
//! - [`ResourceOptions`]: Trailing-slash handling and the base action set
//! - [`ActionArg`], [`Callback`], [`Outcome`]: Positional invocation arguments
//! - [`Placeholder`], [`Resolved`], [`Item`]: What invocations return and resolve to
//! - [`resources`]: The WordPress endpoints

mod action;
mod args;
mod entity;
mod errors;
mod options;
mod params;
mod path;
mod promise;
mod resource;

pub mod resources;

// Public exports
pub use action::{ActionDescriptor, ResponseErrorInterceptor, ResponseInterceptor, TransformFn};
pub use args::{ActionArg, Callback, Outcome, MAX_ARGS, MAX_INSTANCE_ARGS};
pub use entity::{Collection, Entity, Item, Placeholder, Resolved};
pub use errors::{ResourceError, Shape};
pub use options::{builtin_actions, ResourceOptions};
pub use params::{DottedPath, ParamBindings, ParamValue, Producer};
pub use path::{encode_uri_query, encode_uri_segment, ResolvedRoute, UrlTemplate};
pub use promise::InFlight;
pub use resource::{Resource, ResourceBuilder};
