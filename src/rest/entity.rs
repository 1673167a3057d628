//! Result placeholders.
//!
//! Invoking an action returns a placeholder immediately: an [`Entity`] for
//! singular actions or a [`Collection`] for list actions. The placeholder is
//! a shared handle. When the response arrives, the request task fills it in
//! place, so every clone observes the new data.
//!
//! # Example
//!
//! ```rust,ignore
//! let post = posts.get(json!({"id": 7}))?.into_entity().unwrap();
//! assert!(!post.is_resolved());
//!
//! post.promise().unwrap().await?;
//! assert!(post.is_resolved());
//! println!("{}", post.get("title").unwrap());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::rest::args::ActionArg;
use crate::rest::promise::InFlight;
use crate::rest::resource::Resource;

struct EntityState {
    resource: Resource,
    fields: RwLock<Map<String, Value>>,
    resolved: AtomicBool,
    promise: RwLock<Option<InFlight>>,
}

/// A single record of a resource.
///
/// Cloning an `Entity` clones the handle, not the data.
#[derive(Clone)]
pub struct Entity(Arc<EntityState>);

impl Entity {
    pub(crate) fn new(resource: Resource, fields: Map<String, Value>, resolved: bool) -> Self {
        Self(Arc::new(EntityState {
            resource,
            fields: RwLock::new(fields),
            resolved: AtomicBool::new(resolved),
            promise: RwLock::new(None),
        }))
    }

    /// Returns the resource this entity belongs to.
    #[must_use]
    pub fn resource(&self) -> &Resource {
        &self.0.resource
    }

    /// Returns a copy of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_fields().get(key).cloned()
    }

    /// Sets a field.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.write_fields().insert(key.into(), value.into());
    }

    /// Removes a field, returning its old value.
    pub fn unset(&self, key: &str) -> Option<Value> {
        self.write_fields().remove(key)
    }

    /// Returns a snapshot of all fields.
    #[must_use]
    pub fn fields(&self) -> Map<String, Value> {
        self.read_fields().clone()
    }

    /// Returns the fields as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields())
    }

    /// Deserializes the current fields into a typed model.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the fields do not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_value())
    }

    /// Returns `true` once the most recent action on this entity has settled.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.0.resolved.load(Ordering::Acquire)
    }

    /// Returns the handle of the most recent action on this entity.
    #[must_use]
    pub fn promise(&self) -> Option<InFlight> {
        self.0
            .promise
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` if both handles point at the same entity.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Invokes an action with this entity as payload.
    ///
    /// Arguments are `(params?, success?, error?)`. `@field` bindings read
    /// this entity's fields, and singular actions write their response back
    /// into it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown action, bad arguments, or a
    /// call made outside a Tokio runtime.
    pub fn invoke(&self, action: &str, args: Vec<ActionArg>) -> Result<InFlight, ConfigError> {
        self.0.resource.dispatch_instance(self, action, args)
    }

    /// Fetches this entity with the `get` action.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub fn get_remote(&self) -> Result<InFlight, ConfigError> {
        self.invoke("get", Vec::new())
    }

    /// Sends this entity with the `save` action.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub fn save(&self) -> Result<InFlight, ConfigError> {
        self.invoke("save", Vec::new())
    }

    /// Deletes this entity with the `remove` action.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub fn remove(&self) -> Result<InFlight, ConfigError> {
        self.invoke("remove", Vec::new())
    }

    /// Deletes this entity with the `delete` action.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub fn delete(&self) -> Result<InFlight, ConfigError> {
        self.invoke("delete", Vec::new())
    }

    pub(crate) fn replace_fields(&self, fields: Map<String, Value>) {
        *self.write_fields() = fields;
    }

    pub(crate) fn set_resolved(&self, resolved: bool) {
        self.0.resolved.store(resolved, Ordering::Release);
    }

    pub(crate) fn attach(&self, promise: InFlight) {
        *self
            .0
            .promise
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(promise);
    }

    fn read_fields(&self) -> std::sync::RwLockReadGuard<'_, Map<String, Value>> {
        self.0.fields.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_fields(&self) -> std::sync::RwLockWriteGuard<'_, Map<String, Value>> {
        self.0.fields.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read_fields().serialize(serializer)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("fields", &*self.read_fields())
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

/// An element of a [`Collection`].
///
/// Object elements of a list response become entities; any other element is
/// kept as plain JSON.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Item {
    /// An object element wrapped as an entity.
    Entity(Entity),
    /// A non-object element.
    Value(Value),
}

impl Item {
    /// Returns the entity, if this element is one.
    #[must_use]
    pub const fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(entity) => Some(entity),
            Self::Value(_) => None,
        }
    }

    /// Returns the element as JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Entity(entity) => entity.to_value(),
            Self::Value(value) => value.clone(),
        }
    }
}

#[derive(Default)]
struct CollectionState {
    items: RwLock<Vec<Item>>,
    resolved: AtomicBool,
    promise: RwLock<Option<InFlight>>,
}

/// The result of a list action.
///
/// Cloning a `Collection` clones the handle, not the data.
#[derive(Clone, Default)]
pub struct Collection(Arc<CollectionState>);

impl Collection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_items().len()
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_items().is_empty()
    }

    /// Returns the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Item> {
        self.read_items().get(index).cloned()
    }

    /// Returns a snapshot of all elements.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.read_items().clone()
    }

    /// Returns the elements that are entities.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.read_items()
            .iter()
            .filter_map(Item::as_entity)
            .cloned()
            .collect()
    }

    /// Returns the elements as a JSON array.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.read_items().iter().map(Item::to_value).collect())
    }

    /// Deserializes every element into a typed model.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error of the first element that does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.read_items()
            .iter()
            .map(|item| serde_json::from_value(item.to_value()))
            .collect()
    }

    /// Returns `true` once the list action has settled.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.0.resolved.load(Ordering::Acquire)
    }

    /// Returns the handle of the list action.
    #[must_use]
    pub fn promise(&self) -> Option<InFlight> {
        self.0
            .promise
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` if both handles point at the same collection.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn replace_items(&self, items: Vec<Item>) {
        *self.0.items.write().unwrap_or_else(PoisonError::into_inner) = items;
    }

    pub(crate) fn set_resolved(&self, resolved: bool) {
        self.0.resolved.store(resolved, Ordering::Release);
    }

    pub(crate) fn attach(&self, promise: InFlight) {
        *self
            .0
            .promise
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(promise);
    }

    fn read_items(&self) -> std::sync::RwLockReadGuard<'_, Vec<Item>> {
        self.0.items.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read_items().serialize(serializer)
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("items", &*self.read_items())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// The placeholder returned by a resource-level call.
#[derive(Clone, Debug)]
pub enum Placeholder {
    /// Returned by singular actions.
    Entity(Entity),
    /// Returned by list actions.
    Collection(Collection),
}

impl Placeholder {
    /// Returns the entity, if this is a singular result.
    #[must_use]
    pub const fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(entity) => Some(entity),
            Self::Collection(_) => None,
        }
    }

    /// Returns the collection, if this is a list result.
    #[must_use]
    pub const fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            Self::Entity(_) => None,
        }
    }

    /// Converts into the entity, if this is a singular result.
    #[must_use]
    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Self::Entity(entity) => Some(entity),
            Self::Collection(_) => None,
        }
    }

    /// Converts into the collection, if this is a list result.
    #[must_use]
    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            Self::Entity(_) => None,
        }
    }

    /// Returns `true` once the action has settled.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Entity(entity) => entity.is_resolved(),
            Self::Collection(collection) => collection.is_resolved(),
        }
    }

    /// Returns the handle of the action.
    #[must_use]
    pub fn promise(&self) -> Option<InFlight> {
        match self {
            Self::Entity(entity) => entity.promise(),
            Self::Collection(collection) => collection.promise(),
        }
    }

    /// Returns the current data as JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Entity(entity) => entity.to_value(),
            Self::Collection(collection) => collection.to_value(),
        }
    }

    pub(crate) fn set_resolved(&self, resolved: bool) {
        match self {
            Self::Entity(entity) => entity.set_resolved(resolved),
            Self::Collection(collection) => collection.set_resolved(resolved),
        }
    }

    pub(crate) fn attach(&self, promise: InFlight) {
        match self {
            Self::Entity(entity) => entity.attach(promise),
            Self::Collection(collection) => collection.attach(promise),
        }
    }
}

/// The value an action resolves with.
#[derive(Clone, Debug)]
pub enum Resolved {
    /// The placeholder, filled with the response.
    Resource(Placeholder),
    /// A value produced by an interceptor.
    Data(Value),
}

impl Resolved {
    /// Returns the placeholder, unless an interceptor replaced it.
    #[must_use]
    pub const fn as_placeholder(&self) -> Option<&Placeholder> {
        match self {
            Self::Resource(placeholder) => Some(placeholder),
            Self::Data(_) => None,
        }
    }

    /// Returns the interceptor's value, if there is one.
    #[must_use]
    pub const fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Resource(_) => None,
        }
    }

    /// Returns the resolved entity, if there is one.
    #[must_use]
    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Self::Resource(placeholder) => placeholder.into_entity(),
            Self::Data(_) => None,
        }
    }

    /// Returns the resolved collection, if there is one.
    #[must_use]
    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Self::Resource(placeholder) => placeholder.into_collection(),
            Self::Data(_) => None,
        }
    }

    /// Returns the resolved value as JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Resource(placeholder) => placeholder.to_value(),
            Self::Data(value) => value.clone(),
        }
    }
}

// Placeholders are read by view code while request tasks fill them.
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Entity>();
    assert_send_sync::<Collection>();
    assert_send_sync::<Resolved>();
};
