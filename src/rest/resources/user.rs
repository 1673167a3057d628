//! The WordPress user model.
//!
//! Users arrive as the `author` of posts and pages, and from the
//! `users/me` endpoint when the visitor is logged in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::wp_datetime;

/// A WordPress user as exposed by the REST API.
///
/// The REST API only exposes public profile fields to anonymous visitors, so
/// every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct User {
    /// The unique identifier of the user.
    #[serde(rename = "ID", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// The login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// The display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// The last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// The nickname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    /// The URL-friendly name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// The user's website.
    #[serde(rename = "URL", alias = "url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// The biographical info.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the user registered.
    #[serde(
        default,
        with = "wp_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub registered: Option<DateTime<Utc>>,
}
