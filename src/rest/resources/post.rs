//! The WordPress post model.
//!
//! Posts are listed through the `posts` endpoint, filtered by post type:
//!
//! ```rust,ignore
//! use wp_resource::rest::resources::Post;
//! use serde_json::json;
//!
//! let posts = wordpress.posts().query(json!({"postType": "news", "filter[posts_per_page]": 5}))?;
//! posts.promise().unwrap().await?;
//!
//! for post in posts.into_collection().unwrap().deserialize::<Post>()? {
//!     println!("{}", post.title.unwrap_or_default());
//! }
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::wp_datetime;
use super::term::Term;
use super::user::User;

/// A WordPress post of any post type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Post {
    /// The unique identifier of the post.
    #[serde(rename = "ID", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// The rendered title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Publication status, e.g. `publish` or `draft`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// The post type, e.g. `post` or a custom type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,

    /// The author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,

    /// The rendered content HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// The rendered excerpt HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// The parent post, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,

    /// The permalink.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// The URL-friendly name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// The post format, e.g. `standard` or `gallery`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Ordering among siblings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_order: Option<i64>,

    /// Whether the post is stuck to the front page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky: Option<bool>,

    /// The featured image attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<Value>,

    /// Terms by taxonomy name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub terms: HashMap<String, Vec<Term>>,

    /// When the post was published.
    #[serde(default, with = "wp_datetime", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// When the post was last modified.
    #[serde(default, with = "wp_datetime", skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl Post {
    /// Returns the terms of one taxonomy, e.g. `category`.
    #[must_use]
    pub fn terms_of(&self, taxonomy: &str) -> &[Term] {
        self.terms.get(taxonomy).map_or(&[], Vec::as_slice)
    }
}
