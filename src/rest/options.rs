//! Resource factory options.

use std::collections::BTreeMap;

use crate::clients::HttpMethod;
use crate::rest::action::ActionDescriptor;

/// Options applied when building a [`Resource`](crate::rest::Resource).
///
/// `default_actions` is the base action set; actions registered on the
/// builder are merged over it by name.
///
/// # Example
///
/// ```rust
/// use wp_resource::rest::ResourceOptions;
///
/// let options = ResourceOptions::default().strip_trailing_slashes(false);
/// assert!(!options.strips_trailing_slashes());
/// assert!(options.base_actions().contains_key("query"));
/// ```
#[derive(Clone, Debug)]
pub struct ResourceOptions {
    strip_trailing_slashes: bool,
    default_actions: BTreeMap<String, ActionDescriptor>,
}

impl ResourceOptions {
    /// Sets whether trailing slashes are removed from rendered URLs.
    #[must_use]
    pub const fn strip_trailing_slashes(mut self, strip: bool) -> Self {
        self.strip_trailing_slashes = strip;
        self
    }

    /// Replaces the base action set.
    #[must_use]
    pub fn default_actions(mut self, actions: BTreeMap<String, ActionDescriptor>) -> Self {
        self.default_actions = actions;
        self
    }

    /// Returns `true` if trailing slashes are removed.
    #[must_use]
    pub const fn strips_trailing_slashes(&self) -> bool {
        self.strip_trailing_slashes
    }

    /// Returns the base action set.
    #[must_use]
    pub const fn base_actions(&self) -> &BTreeMap<String, ActionDescriptor> {
        &self.default_actions
    }
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            strip_trailing_slashes: true,
            default_actions: builtin_actions(),
        }
    }
}

/// The built-in actions: `get`, `save`, `query`, `remove` and `delete`.
#[must_use]
pub fn builtin_actions() -> BTreeMap<String, ActionDescriptor> {
    [
        ("get", ActionDescriptor::new(HttpMethod::Get)),
        ("save", ActionDescriptor::new(HttpMethod::Post)),
        ("query", ActionDescriptor::new(HttpMethod::Get).array(true)),
        ("remove", ActionDescriptor::new(HttpMethod::Delete)),
        ("delete", ActionDescriptor::new(HttpMethod::Delete)),
    ]
    .into_iter()
    .map(|(name, action)| (name.to_string(), action))
    .collect()
}
