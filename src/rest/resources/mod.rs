//! The WordPress endpoints the site consumes.
//!
//! [`WordPress`] builds one [`Resource`] per endpoint, rooted at the
//! configured [`ApiRoot`]:
//!
//! | Accessor         | Template                      | Typical action |
//! |------------------|-------------------------------|----------------|
//! | `posts`          | `posts/?type=:postType`       | `query`        |
//! | `pages`          | `pages/:pageSlug`             | `get`          |
//! | `categories`     | `taxonomies/category/terms`   | `query`        |
//! | `menus`          | `menus/:menuId`               | `get`          |
//! | `current_user`   | `users/me`                    | `get`          |
//!
//! Entities returned by these resources deserialize into the typed models of
//! this module with [`Entity::deserialize`](crate::rest::Entity::deserialize).
//!
//! # Example
//!
//! ```rust,ignore
//! use wp_resource::rest::resources::{WordPress, Page, AuthStatus};
//! use serde_json::json;
//!
//! let wordpress = WordPress::new(client, config.api_root())?;
//!
//! let about = wordpress.pages().get(json!({"pageSlug": "about-us"}))?;
//! about.promise().unwrap().await?;
//! let page: Page = about.as_entity().unwrap().deserialize()?;
//!
//! if wordpress.auth_status().await? == AuthStatus::Authenticated {
//!     println!("Welcome back");
//! }
//! ```

mod common;
mod menu;
mod page;
mod post;
mod term;
mod user;

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::clients::{HttpClient, HttpMethod};
use crate::config::ApiRoot;
use crate::error::ConfigError;
use crate::rest::{ActionDescriptor, Resolved, Resource, ResourceError};

pub use common::wp_datetime;
pub use menu::{Menu, MenuItem};
pub use page::Page;
pub use post::Post;
pub use term::Term;
pub use user::User;

/// Name of the action [`WordPress::auth_status`] invokes on `current_user`.
pub const AUTH_STATUS_ACTION: &str = "authStatus";

/// Whether the visitor is logged in to WordPress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    /// The visitor has a valid session.
    Authenticated,
    /// The visitor is not logged in.
    Anonymous,
}

impl AuthStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::Anonymous => "anonymous",
        }
    }

    fn from_resolved(resolved: &Resolved) -> Option<Self> {
        match resolved.as_data()?.as_str()? {
            "authenticated" => Some(Self::Authenticated),
            "anonymous" => Some(Self::Anonymous),
            _ => None,
        }
    }

    /// Maps the status code of a `users/me` request.
    ///
    /// The endpoint redirects logged-in users to their profile (302) and
    /// refuses everyone else (401 or 403).
    #[must_use]
    pub const fn from_status(code: u16) -> Option<Self> {
        match code {
            200..=299 | 302 => Some(Self::Authenticated),
            401 | 403 => Some(Self::Anonymous),
            _ => None,
        }
    }
}

/// Error returned by [`WordPress::auth_status`].
#[derive(Debug, Error)]
pub enum WordPressError {
    /// The action could not be invoked.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request failed with a status that says nothing about the session.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// The fixed set of WordPress endpoints.
#[derive(Clone, Debug)]
pub struct WordPress {
    posts: Resource,
    pages: Resource,
    categories: Resource,
    menus: Resource,
    current_user: Resource,
}

impl WordPress {
    /// Builds every endpoint under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an endpoint template is rejected.
    pub fn new(client: Arc<HttpClient>, root: &ApiRoot) -> Result<Self, ConfigError> {
        let endpoint = |path: &str| Resource::builder(Arc::clone(&client), root.endpoint(path));

        let current_user = endpoint("users/me")
            .action(AUTH_STATUS_ACTION, auth_status_action())
            .build()?;

        Ok(Self {
            posts: endpoint("posts/?type=:postType").build()?,
            pages: endpoint("pages/:pageSlug").build()?,
            categories: endpoint("taxonomies/category/terms").build()?,
            menus: endpoint("menus/:menuId").build()?,
            current_user,
        })
    }

    /// Posts of a post type; pass `postType` and any filters to `query`.
    #[must_use]
    pub const fn posts(&self) -> &Resource {
        &self.posts
    }

    /// Pages by slug; pass `pageSlug` to `get`.
    #[must_use]
    pub const fn pages(&self) -> &Resource {
        &self.pages
    }

    /// Terms of the `category` taxonomy.
    #[must_use]
    pub const fn categories(&self) -> &Resource {
        &self.categories
    }

    /// Navigation menus; pass `menuId` to `get`.
    #[must_use]
    pub const fn menus(&self) -> &Resource {
        &self.menus
    }

    /// The logged-in user.
    #[must_use]
    pub const fn current_user(&self) -> &Resource {
        &self.current_user
    }

    /// Asks WordPress whether the visitor is logged in.
    ///
    /// # Errors
    ///
    /// Returns [`WordPressError::Config`] if called outside a Tokio runtime and
    /// [`WordPressError::Resource`] if the request fails with a status that
    /// does not map to an [`AuthStatus`].
    pub async fn auth_status(&self) -> Result<AuthStatus, WordPressError> {
        let placeholder = self.current_user.call(AUTH_STATUS_ACTION, Vec::new())?;
        let handle = placeholder.promise().ok_or(ResourceError::Aborted)?;
        let resolved = handle.await?;

        let status = AuthStatus::from_resolved(&resolved).ok_or(ResourceError::Aborted)?;
        tracing::debug!("WordPress session is {}", status.as_str());
        Ok(status)
    }
}

/// `GET users/me`, resolving to the session state instead of the user.
fn auth_status_action() -> ActionDescriptor {
    let resolve = |status: AuthStatus| Resolved::Data(json!(status.as_str()));

    ActionDescriptor::new(HttpMethod::Get)
        .interceptor(move |_, response| {
            resolve(AuthStatus::from_status(response.code).unwrap_or(AuthStatus::Authenticated))
        })
        .error_interceptor(move |error| error.status().and_then(AuthStatus::from_status).map(resolve))
}
