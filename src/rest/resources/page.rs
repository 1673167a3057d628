//! The WordPress page model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::wp_datetime;
use super::user::User;

/// A static WordPress page, fetched by slug through the `pages` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Page {
    /// The unique identifier of the page.
    #[serde(rename = "ID", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// The rendered title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The URL-friendly name the page is fetched by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Publication status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// The author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,

    /// The rendered content HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// The rendered excerpt HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// The parent page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,

    /// Ordering among sibling pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_order: Option<i64>,

    /// The permalink.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// The page template file, if one is assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// The featured image attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<Value>,

    /// Custom fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    /// When the page was published.
    #[serde(default, with = "wp_datetime", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// When the page was last modified.
    #[serde(default, with = "wp_datetime", skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}
