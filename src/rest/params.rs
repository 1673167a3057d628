//! Parameter bindings for URL templates.
//!
//! A binding supplies a value for a parameter name. The value is either a
//! literal, a producer function evaluated on every request, or a `@dotted.path`
//! read from the outgoing payload.
//!
//! # Example
//!
//! ```rust
//! use wp_resource::rest::ParamBindings;
//! use serde_json::json;
//!
//! let bindings = ParamBindings::new()
//!     .literal("type", "page")
//!     .binding("id", "@id")
//!     .producer("_", || json!(42));
//!
//! let params = bindings.resolve(Some(&json!({"id": 7})));
//! assert_eq!(params["type"], json!("page"));
//! assert_eq!(params["id"], json!(7));
//! assert_eq!(params["_"], json!(42));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::rest::path::RESERVED_NAME;

/// A function producing a parameter value at request time.
pub type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

/// A dotted member path such as `author.id`, written `@author.id` in a binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DottedPath(String);

impl DottedPath {
    /// Creates a path from its text, without the leading `@`.
    ///
    /// The path is checked by [`validate`](Self::validate), which runs when the
    /// resource is built.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the path text without the leading `@`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks the path against the member grammar.
    ///
    /// Each `.`-separated segment must match `[A-Za-z_$@][A-Za-z0-9_$@]*` and
    /// must not be `hasOwnProperty`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedPath`] or
    /// [`ConfigError::ReservedParameterName`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for segment in self.0.split('.') {
            let mut chars = segment.chars();
            let head_ok = chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '$' | '@'));
            let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '@'));
            if !(head_ok && tail_ok) {
                return Err(ConfigError::MalformedPath {
                    path: self.0.clone(),
                });
            }
            if segment == RESERVED_NAME {
                return Err(ConfigError::ReservedParameterName {
                    name: segment.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Walks `data` along the path.
    ///
    /// Returns `None` when any step is missing or is not an object.
    #[must_use]
    pub fn lookup<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        self.0
            .split('.')
            .try_fold(data, |current, key| current.as_object()?.get(key))
    }
}

/// The value bound to a parameter name.
#[derive(Clone)]
pub enum ParamValue {
    /// A fixed value.
    Literal(Value),
    /// A function called once per request.
    Producer(Producer),
    /// A field of the outgoing payload.
    DataPath(DottedPath),
}

impl ParamValue {
    /// Evaluates the binding. `None` means the value is undefined.
    #[must_use]
    pub fn evaluate(&self, payload: Option<&Value>) -> Option<Value> {
        match self {
            Self::Literal(value) => Some(value.clone()),
            Self::Producer(produce) => Some(produce()),
            Self::DataPath(path) => payload.and_then(|data| path.lookup(data)).cloned(),
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
            Self::DataPath(path) => write!(f, "DataPath(@{})", path.as_str()),
        }
    }
}

/// Strings starting with `@` become [`ParamValue::DataPath`]; every other
/// value is a literal.
impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) if s.starts_with('@') => Self::DataPath(DottedPath::new(&s[1..])),
            other => Self::Literal(other),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Value::from(value).into()
    }
}

/// An ordered set of parameter bindings.
#[derive(Clone, Debug, Default)]
pub struct ParamBindings {
    entries: BTreeMap<String, ParamValue>,
}

impl ParamBindings {
    /// Creates an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to a literal value, taken verbatim even if it starts with `@`.
    #[must_use]
    pub fn literal(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .insert(name.into(), ParamValue::Literal(value.into()));
        self
    }

    /// Binds `name` to a value, reading `@path` strings from the payload.
    #[must_use]
    pub fn binding(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Binds `name` to a function evaluated on every request.
    #[must_use]
    pub fn producer<F>(mut self, name: impl Into<String>, produce: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.entries
            .insert(name.into(), ParamValue::Producer(Arc::new(produce)));
        self
    }

    /// Builds bindings from a JSON object, as [`binding`](Self::binding) does
    /// for each member. Non-object values produce no bindings.
    #[must_use]
    pub fn from_object(object: &Value) -> Self {
        object
            .as_object()
            .into_iter()
            .flatten()
            .map(|(name, value)| (name.clone(), ParamValue::from(value.clone())))
            .collect()
    }

    /// Returns the binding for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.get(name)
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns these bindings overlaid with `other`; `other` wins on conflicts.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { entries }
    }

    /// Checks every name and dotted path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReservedParameterName`] for a binding named
    /// `hasOwnProperty` and [`ConfigError::MalformedPath`] for an invalid path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in &self.entries {
            if name == RESERVED_NAME {
                return Err(ConfigError::ReservedParameterName { name: name.clone() });
            }
            if let ParamValue::DataPath(path) = value {
                path.validate()?;
            }
        }
        Ok(())
    }

    /// Evaluates every binding against `payload`, leaving out undefined ones.
    #[must_use]
    pub fn resolve(&self, payload: Option<&Value>) -> Map<String, Value> {
        self.entries
            .iter()
            .filter_map(|(name, value)| Some((name.clone(), value.evaluate(payload)?)))
            .collect()
    }
}

impl FromIterator<(String, ParamValue)> for ParamBindings {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
