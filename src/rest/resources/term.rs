//! The WordPress taxonomy term model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A term of a taxonomy, such as a category.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Term {
    /// The unique identifier of the term.
    #[serde(rename = "ID", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// The display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The URL-friendly name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// The description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The taxonomy the term belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<String>,

    /// The parent term: an object, an ID, or `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,

    /// Number of posts using the term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    /// The archive URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Term {
    /// Returns the parent term's ID, whether the parent is embedded or referenced.
    #[must_use]
    pub fn parent_id(&self) -> Option<u64> {
        match self.parent.as_ref()? {
            Value::Number(n) => n.as_u64().filter(|id| *id != 0),
            Value::Object(parent) => parent
                .get("ID")
                .or_else(|| parent.get("id"))
                .and_then(Value::as_u64),
            _ => None,
        }
    }
}
