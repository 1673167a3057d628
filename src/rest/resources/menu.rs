//! Navigation menu models.
//!
//! Menus are served by the menus extension of the REST API under
//! `menus/:menuId`. Items arrive flat with a `parent` reference; use
//! [`Menu::tree`] to nest them.

use serde::{Deserialize, Serialize};

/// A navigation menu.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Menu {
    /// The unique identifier of the menu.
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

    /// Number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    /// The items in menu order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuItem>,
}

/// An entry of a [`Menu`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MenuItem {
    /// The unique identifier of the item.
    #[serde(rename = "ID", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Position within the menu.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u64>,

    /// The parent item's ID; `0` for top-level items.
    #[serde(default)]
    pub parent: u64,

    /// The label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The link target URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The `title` attribute of the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,

    /// The `target` attribute of the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// CSS classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,

    /// The ID of the linked object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<u64>,

    /// The linked object kind, e.g. `page` or `category`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// The link kind, e.g. `post_type` or `custom`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,

    /// Child items, filled by [`Menu::tree`] or by endpoints that nest.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl Menu {
    /// Returns the items nested under their parents.
    ///
    /// Items whose parent is missing from the menu are kept at the top level.
    #[must_use]
    pub fn tree(&self) -> Vec<MenuItem> {
        let known: Vec<u64> = self.items.iter().filter_map(|item| item.id).collect();
        let roots = self
            .items
            .iter()
            .filter(|item| item.parent == 0 || !known.contains(&item.parent));
        roots.map(|root| self.with_children(root)).collect()
    }

    fn with_children(&self, item: &MenuItem) -> MenuItem {
        let mut node = item.clone();
        if let Some(id) = item.id {
            node.children = self
                .items
                .iter()
                .filter(|child| child.parent == id && child.id != Some(id))
                .map(|child| self.with_children(child))
                .collect();
        }
        node
    }
}
