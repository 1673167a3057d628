//! The resource factory.
//!
//! A [`Resource`] combines a URL template, default parameter bindings, and a
//! registry of named actions. Invoking an action resolves parameters, renders
//! the URL, spawns the request on the current Tokio runtime, and returns a
//! placeholder that is filled in place when the response arrives.
//!
//! # Example
//!
//! ```rust,ignore
//! use wp_resource::rest::{Resource, ParamBindings, ActionDescriptor, ActionArg};
//! use wp_resource::clients::HttpMethod;
//! use serde_json::json;
//!
//! let cards = Resource::builder(client, "/user/:userId/card/:cardId")
//!     .param_defaults(ParamBindings::new().literal("userId", 123).binding("cardId", "@id"))
//!     .action("charge", ActionDescriptor::new(HttpMethod::Post).params(
//!         ParamBindings::new().literal("charge", true),
//!     ))
//!     .build()?;
//!
//! let card = cards.get(json!({"cardId": 456}))?.into_entity().unwrap();
//! card.promise().unwrap().await?;
//!
//! card.set("amount", 9.99);
//! card.invoke("charge", vec![])?.await?;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::runtime::Handle;

use crate::clients::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::error::ConfigError;
use crate::rest::action::ActionDescriptor;
use crate::rest::args::{self, ActionArg, Callback, Outcome};
use crate::rest::entity::{Collection, Entity, Item, Placeholder, Resolved};
use crate::rest::errors::{ResourceError, Shape};
use crate::rest::options::ResourceOptions;
use crate::rest::params::ParamBindings;
use crate::rest::path::{ResolvedRoute, UrlTemplate};
use crate::rest::promise::{self, Settler};

/// An action with its URL override parsed.
#[derive(Debug)]
struct CompiledAction {
    name: String,
    descriptor: ActionDescriptor,
    template: Option<UrlTemplate>,
}

impl CompiledAction {
    fn compile(name: String, descriptor: ActionDescriptor) -> Result<Self, ConfigError> {
        if descriptor.has_body() && matches!(descriptor.method, HttpMethod::Get | HttpMethod::Head) {
            return Err(ConfigError::BodyNotAllowed {
                action: name,
                method: descriptor.method.to_string(),
            });
        }
        descriptor.params.validate()?;
        let template = descriptor
            .url
            .as_deref()
            .map(UrlTemplate::parse)
            .transpose()?;
        Ok(Self {
            name,
            descriptor,
            template,
        })
    }

    const fn expected_shape(&self) -> Shape {
        if self.descriptor.is_array {
            Shape::Array
        } else {
            Shape::Object
        }
    }

    /// Applies the response transform and checks the body shape.
    fn accept(&self, mut response: HttpResponse) -> Result<HttpResponse, ResourceError> {
        if let Some(transform) = &self.descriptor.transform_response {
            response.body = transform(response.body.take());
        }

        if let Some(body) = response.body.as_ref().filter(|body| !body.is_null()) {
            let actual = Shape::of(body);
            let expected = self.expected_shape();
            if actual != expected {
                tracing::warn!(
                    "Action '{}' expected an {} response but got an {}",
                    self.name,
                    expected,
                    actual
                );
                return Err(ResourceError::ResponseShapeMismatch {
                    action: self.name.clone(),
                    expected,
                    actual,
                });
            }
        }

        Ok(response)
    }
}

struct ResourceInner {
    client: Arc<HttpClient>,
    template: UrlTemplate,
    defaults: ParamBindings,
    actions: BTreeMap<String, Arc<CompiledAction>>,
    strip_trailing_slashes: bool,
}

/// A parametrized REST resource.
///
/// Cloning a `Resource` is cheap; clones share the client, template, and
/// action registry.
#[derive(Clone)]
pub struct Resource {
    inner: Arc<ResourceInner>,
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};

impl Resource {
    /// Starts building a resource for `template`.
    #[must_use]
    pub fn builder(client: Arc<HttpClient>, template: impl Into<String>) -> ResourceBuilder {
        ResourceBuilder {
            client,
            template: template.into(),
            defaults: ParamBindings::new(),
            actions: BTreeMap::new(),
            options: ResourceOptions::default(),
        }
    }

    /// Returns the URL template.
    #[must_use]
    pub fn template(&self) -> &UrlTemplate {
        &self.inner.template
    }

    /// Returns the client requests are sent through.
    #[must_use]
    pub fn client(&self) -> &Arc<HttpClient> {
        &self.inner.client
    }

    /// Returns the descriptor of an action.
    #[must_use]
    pub fn action(&self, name: &str) -> Option<&ActionDescriptor> {
        self.inner.actions.get(name).map(|action| &action.descriptor)
    }

    /// Returns the names of all registered actions.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.inner.actions.keys().map(String::as_str)
    }

    /// Derives a resource with additional default bindings.
    ///
    /// The new resource shares the template and actions; `extra` wins over
    /// this resource's defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `extra` contains an invalid binding.
    pub fn bind(&self, extra: ParamBindings) -> Result<Self, ConfigError> {
        extra.validate()?;
        Ok(Self {
            inner: Arc::new(ResourceInner {
                client: Arc::clone(&self.inner.client),
                template: self.inner.template.clone(),
                defaults: self.inner.defaults.merged(&extra),
                actions: self.inner.actions.clone(),
                strip_trailing_slashes: self.inner.strip_trailing_slashes,
            }),
        })
    }

    /// Creates an unsaved entity of this resource.
    #[must_use]
    pub fn entity(&self, fields: Map<String, Value>) -> Entity {
        Entity::new(self.clone(), fields, false)
    }

    /// Renders the URL and query an action would request, without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAction`] if no such action exists.
    pub fn route(
        &self,
        action: &str,
        params: &Map<String, Value>,
        payload: Option<&Value>,
    ) -> Result<ResolvedRoute, ConfigError> {
        let compiled = self.compiled(action)?;
        Ok(self.resolve_route(&compiled, params, payload))
    }

    /// Invokes an action with positional arguments.
    ///
    /// Returns the placeholder right away; the request runs on the current
    /// Tokio runtime. A lone data argument is the body for actions that send
    /// one and the parameters otherwise; see [`ActionArg`] for the other forms.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] before any request is made if the action is
    /// unknown, the arguments are invalid, or there is no Tokio runtime.
    pub fn call(&self, action: &str, args: Vec<ActionArg>) -> Result<Placeholder, ConfigError> {
        let compiled = self.compiled(action)?;
        let parsed = args::parse_class_args(action, compiled.descriptor.has_body(), args)?;

        let placeholder = if compiled.descriptor.is_array {
            Placeholder::Collection(Collection::new())
        } else {
            let fields = parsed
                .data
                .as_ref()
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            Placeholder::Entity(Entity::new(self.clone(), fields, false))
        };

        self.dispatch(
            &compiled,
            &parsed.params,
            parsed.data,
            placeholder.clone(),
            parsed.success,
            parsed.error,
        )?;
        Ok(placeholder)
    }

    /// Invokes `get` with `params`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn get(&self, params: Value) -> Result<Placeholder, ConfigError> {
        self.call("get", vec![ActionArg::Data(params)])
    }

    /// Invokes `query` with `params`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn query(&self, params: Value) -> Result<Placeholder, ConfigError> {
        self.call("query", vec![ActionArg::Data(params)])
    }

    /// Invokes `save` with `data` as the body.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn save(&self, data: Value) -> Result<Placeholder, ConfigError> {
        self.call("save", vec![ActionArg::Data(data)])
    }

    /// Invokes `remove` with `params`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn remove(&self, params: Value) -> Result<Placeholder, ConfigError> {
        self.call("remove", vec![ActionArg::Data(params)])
    }

    /// Invokes `delete` with `params`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn delete(&self, params: Value) -> Result<Placeholder, ConfigError> {
        self.call("delete", vec![ActionArg::Data(params)])
    }

    /// Invokes an action on behalf of `entity`.
    pub(crate) fn dispatch_instance(
        &self,
        entity: &Entity,
        action: &str,
        args: Vec<ActionArg>,
    ) -> Result<promise::InFlight, ConfigError> {
        let compiled = self.compiled(action)?;
        let parsed = args::parse_instance_args(action, args)?;

        // list responses never overwrite the entity
        let target = if compiled.descriptor.is_array {
            Placeholder::Collection(Collection::new())
        } else {
            Placeholder::Entity(entity.clone())
        };

        self.dispatch(
            &compiled,
            &parsed.params,
            Some(entity.to_value()),
            target,
            parsed.success,
            parsed.error,
        )
    }

    fn compiled(&self, action: &str) -> Result<Arc<CompiledAction>, ConfigError> {
        self.inner
            .actions
            .get(action)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownAction {
                action: action.to_string(),
            })
    }

    /// Merges bindings: caller params over action bindings over defaults.
    fn resolve_params(
        &self,
        action: &CompiledAction,
        caller: &Map<String, Value>,
        payload: Option<&Value>,
    ) -> Map<String, Value> {
        let mut params = self
            .inner
            .defaults
            .merged(&action.descriptor.params)
            .resolve(payload);
        for (key, value) in caller {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    fn resolve_route(
        &self,
        action: &CompiledAction,
        caller: &Map<String, Value>,
        payload: Option<&Value>,
    ) -> ResolvedRoute {
        let params = self.resolve_params(action, caller, payload);
        action
            .template
            .as_ref()
            .unwrap_or(&self.inner.template)
            .resolve(&params, self.inner.strip_trailing_slashes)
    }

    fn build_request(
        &self,
        action: &CompiledAction,
        caller: &Map<String, Value>,
        payload: Option<Value>,
    ) -> HttpRequest {
        let route = self.resolve_route(action, caller, payload.as_ref());
        let descriptor = &action.descriptor;

        let body = if descriptor.has_body() {
            let body = Some(payload.unwrap_or_else(|| Value::Object(Map::new())));
            match &descriptor.transform_request {
                Some(transform) => transform(body),
                None => body,
            }
        } else {
            None
        };

        HttpRequest {
            http_method: descriptor.method,
            path: route.url,
            body,
            query: route.query,
            extra_headers: descriptor.headers.clone(),
            timeout: descriptor.timeout.clone(),
            cache: descriptor.cache,
        }
    }

    fn dispatch(
        &self,
        action: &Arc<CompiledAction>,
        params: &Map<String, Value>,
        payload: Option<Value>,
        target: Placeholder,
        success: Option<Callback>,
        error: Option<Callback>,
    ) -> Result<promise::InFlight, ConfigError> {
        let runtime = Handle::try_current().map_err(|_| ConfigError::MissingRuntime {
            action: action.name.clone(),
        })?;

        let request = self.build_request(action, params, payload);
        tracing::debug!(
            "Dispatching action '{}': {} {}",
            action.name,
            request.http_method,
            request.path
        );

        let (settler, handle) = promise::channel();
        target.set_resolved(false);
        target.attach(handle.clone());

        let task = Settlement {
            resource: self.clone(),
            action: Arc::clone(action),
            target,
            success,
            error,
            settler: Some(settler),
        };
        runtime.spawn(task.run(request));

        Ok(handle)
    }

    /// Writes a response body into a placeholder.
    ///
    /// A missing or `null` body changes nothing, and neither does a scalar
    /// body for a singular action.
    fn fill(&self, target: &Placeholder, body: Option<&Value>) {
        match (target, body) {
            (Placeholder::Collection(collection), Some(Value::Array(elements))) => {
                let items = elements
                    .iter()
                    .map(|element| match element {
                        Value::Object(fields) => {
                            Item::Entity(Entity::new(self.clone(), fields.clone(), true))
                        }
                        other => Item::Value(other.clone()),
                    })
                    .collect();
                collection.replace_items(items);
            }
            (Placeholder::Entity(entity), Some(Value::Object(fields))) => {
                entity.replace_fields(fields.clone());
            }
            _ => {}
        }
    }
}

/// Everything the request task needs to settle an invocation.
///
/// Dropping an unsettled `Settlement` (the task was cancelled or its runtime
/// shut down) still marks the placeholder resolved before awaiters observe
/// [`ResourceError::Aborted`].
struct Settlement {
    resource: Resource,
    action: Arc<CompiledAction>,
    target: Placeholder,
    success: Option<Callback>,
    error: Option<Callback>,
    settler: Option<Settler>,
}

impl Settlement {
    async fn run(mut self, request: HttpRequest) {
        let outcome = match self.resource.inner.client.request(request).await {
            Ok(response) => self.action.accept(response),
            Err(e) => Err(ResourceError::from(e)),
        };

        let settled = match outcome {
            Ok(response) => Ok(self.succeed(&response)),
            Err(error) => self.fail(error),
        };
        if let Some(settler) = self.settler.take() {
            settler.settle(settled);
        }
    }

    fn succeed(&self, response: &HttpResponse) -> Resolved {
        self.resource.fill(&self.target, response.body.as_ref());
        self.target.set_resolved(true);

        let value = match &self.action.descriptor.interceptor {
            Some(interceptor) => interceptor(&self.target, response),
            None => Resolved::Resource(self.target.clone()),
        };
        if let Some(callback) = &self.success {
            callback.call(Outcome::Success {
                value: &value,
                response,
            });
        }
        value
    }

    fn fail(&self, error: ResourceError) -> Result<Resolved, ResourceError> {
        self.target.set_resolved(true);
        tracing::debug!("Action '{}' failed: {}", self.action.name, error);

        if let Some(callback) = &self.error {
            callback.call(Outcome::Failure(&error));
        }
        let recovered = self
            .action
            .descriptor
            .error_interceptor
            .as_ref()
            .and_then(|interceptor| interceptor(&error));
        match recovered {
            Some(value) => Ok(value),
            None => Err(error),
        }
    }
}

impl Drop for Settlement {
    fn drop(&mut self) {
        if let Some(settler) = self.settler.take() {
            self.target.set_resolved(true);
            drop(settler);
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("template", &self.inner.template.as_str())
            .field("defaults", &self.inner.defaults)
            .field("actions", &self.inner.actions.keys().collect::<Vec<_>>())
            .field("strip_trailing_slashes", &self.inner.strip_trailing_slashes)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Resource`].
pub struct ResourceBuilder {
    client: Arc<HttpClient>,
    template: String,
    defaults: ParamBindings,
    actions: BTreeMap<String, ActionDescriptor>,
    options: ResourceOptions,
}

impl ResourceBuilder {
    /// Sets the bindings applied to every action.
    #[must_use]
    pub fn param_defaults(mut self, defaults: ParamBindings) -> Self {
        self.defaults = defaults;
        self
    }

    /// Registers an action, replacing any built-in action of the same name.
    #[must_use]
    pub fn action(mut self, name: impl Into<String>, descriptor: ActionDescriptor) -> Self {
        self.actions.insert(name.into(), descriptor);
        self
    }

    /// Sets the factory options.
    #[must_use]
    pub fn options(mut self, options: ResourceOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates everything and builds the resource.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a template is empty or uses a reserved name,
    /// or if a binding has a reserved name or a malformed dotted path. A GET or
    /// HEAD action set to send a body is rejected with
    /// [`ConfigError::BodyNotAllowed`].
    pub fn build(self) -> Result<Resource, ConfigError> {
        let template = UrlTemplate::parse(&self.template)?;
        self.defaults.validate()?;

        let mut descriptors = self.options.base_actions().clone();
        descriptors.extend(self.actions);

        let actions = descriptors
            .into_iter()
            .map(|(name, descriptor)| {
                let compiled = CompiledAction::compile(name.clone(), descriptor)?;
                Ok((name, Arc::new(compiled)))
            })
            .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;

        tracing::debug!(
            "Built resource '{}' with actions {:?}",
            template.as_str(),
            actions.keys().collect::<Vec<_>>()
        );

        Ok(Resource {
            inner: Arc::new(ResourceInner {
                client: self.client,
                template,
                defaults: self.defaults,
                actions,
                strip_trailing_slashes: self.options.strips_trailing_slashes(),
            }),
        })
    }
}

impl fmt::Debug for ResourceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBuilder")
            .field("template", &self.template)
            .field("defaults", &self.defaults)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;
    use crate::config::{BaseUrl, ClientConfig};
    use serde_json::json;

    fn client() -> Arc<HttpClient> {
        let config = ClientConfig::builder()
            .base_url(BaseUrl::new("https://blog.example.com").unwrap())
            .build()
            .unwrap();
        Arc::new(HttpClient::new(&config).unwrap())
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn cards() -> Resource {
        Resource::builder(client(), "/user/:userId/card/:cardId")
            .param_defaults(
                ParamBindings::new()
                    .literal("userId", 123)
                    .binding("cardId", "@id"),
            )
            .action(
                "charge",
                ActionDescriptor::new(HttpMethod::Post)
                    .params(ParamBindings::new().literal("charge", true)),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_registers_default_and_custom_actions() {
        let resource = cards();
        let names: Vec<&str> = resource.action_names().collect();
        assert_eq!(names, vec!["charge", "delete", "get", "query", "remove", "save"]);
        assert_eq!(resource.action("charge").unwrap().method(), HttpMethod::Post);
    }

    #[test]
    fn test_custom_action_overrides_builtin() {
        let resource = Resource::builder(client(), "/posts/:id")
            .action("get", ActionDescriptor::new(HttpMethod::Get).array(true))
            .build()
            .unwrap();
        assert!(resource.action("get").unwrap().is_array());
    }

    #[test]
    fn test_build_rejects_reserved_placeholder() {
        let result = Resource::builder(client(), "/x/:hasOwnProperty").build();
        assert!(matches!(result, Err(ConfigError::ReservedParameterName { .. })));
    }

    #[test]
    fn test_build_rejects_malformed_default_path() {
        let result = Resource::builder(client(), "/x/:id")
            .param_defaults(ParamBindings::new().binding("id", "@1bad"))
            .build();
        assert!(matches!(result, Err(ConfigError::MalformedPath { ref path }) if path == "1bad"));
    }

    #[test]
    fn test_build_rejects_malformed_action_binding() {
        let result = Resource::builder(client(), "/x/:id")
            .action(
                "publish",
                ActionDescriptor::new(HttpMethod::Post)
                    .params(ParamBindings::new().binding("id", "@a..b")),
            )
            .build();
        assert!(matches!(result, Err(ConfigError::MalformedPath { .. })));
    }

    #[test]
    fn test_build_rejects_empty_action_url() {
        let result = Resource::builder(client(), "/x")
            .action("other", ActionDescriptor::new(HttpMethod::Get).url(""))
            .build();
        assert!(matches!(result, Err(ConfigError::EmptyTemplate)));
    }

    #[test]
    fn test_build_rejects_body_on_get_and_head() {
        for method in [HttpMethod::Get, HttpMethod::Head] {
            let result = Resource::builder(client(), "/search")
                .action("search", ActionDescriptor::new(method).body(true))
                .build();
            assert_eq!(
                result.unwrap_err(),
                ConfigError::BodyNotAllowed {
                    action: "search".to_string(),
                    method: method.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_build_accepts_body_override_on_delete() {
        let resource = Resource::builder(client(), "/posts/:id")
            .action("purge", ActionDescriptor::new(HttpMethod::Delete).body(true))
            .build()
            .unwrap();
        assert!(resource.action("purge").unwrap().has_body());
    }

    #[test]
    fn test_route_uses_defaults_and_data_paths() {
        let resource = cards();
        let route = resource
            .route("get", &Map::new(), Some(&json!({"id": 456})))
            .unwrap();
        assert_eq!(route.url, "/user/123/card/456");
        assert!(route.query.is_empty());
    }

    #[test]
    fn test_route_caller_params_win() {
        let resource = cards();
        let route = resource
            .route("get", &object(json!({"userId": 9, "cardId": 1})), Some(&json!({"id": 456})))
            .unwrap();
        assert_eq!(route.url, "/user/9/card/1");
    }

    #[test]
    fn test_route_caller_null_overrides_default() {
        let resource = cards();
        let route = resource
            .route("get", &object(json!({"userId": null})), None)
            .unwrap();
        assert_eq!(route.url, "/user/card");
    }

    #[test]
    fn test_route_action_bindings_go_to_query() {
        let resource = cards();
        let route = resource
            .route("charge", &Map::new(), Some(&json!({"id": 456})))
            .unwrap();
        assert_eq!(route.url, "/user/123/card/456");
        assert_eq!(route.query, vec![("charge".to_string(), "true".to_string())]);
    }

    #[test]
    fn test_route_unknown_action() {
        let result = cards().route("publish", &Map::new(), None);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::UnknownAction {
                action: "publish".to_string()
            }
        );
    }

    #[test]
    fn test_action_url_override() {
        let resource = Resource::builder(client(), "/posts/:id")
            .action(
                "revisions",
                ActionDescriptor::new(HttpMethod::Get)
                    .array(true)
                    .url("/posts/:id/revisions"),
            )
            .build()
            .unwrap();
        let route = resource
            .route("revisions", &object(json!({"id": 8})), None)
            .unwrap();
        assert_eq!(route.url, "/posts/8/revisions");
    }

    #[test]
    fn test_bind_adds_defaults() {
        let resource = Resource::builder(client(), "/posts/:id").build().unwrap();
        let bound = resource
            .bind(ParamBindings::new().literal("id", 5).literal("context", "view"))
            .unwrap();

        let route = bound.route("get", &Map::new(), None).unwrap();
        assert_eq!(route.url, "/posts/5");
        assert_eq!(route.query, vec![("context".to_string(), "view".to_string())]);

        // the base resource is untouched
        assert_eq!(resource.route("get", &Map::new(), None).unwrap().url, "/posts");
    }

    #[test]
    fn test_bind_rejects_reserved_name() {
        let resource = Resource::builder(client(), "/posts").build().unwrap();
        let result = resource.bind(ParamBindings::new().literal("hasOwnProperty", 1));
        assert!(matches!(result, Err(ConfigError::ReservedParameterName { .. })));
    }

    #[test]
    fn test_call_outside_runtime_fails() {
        let result = cards().get(json!({"cardId": 1}));
        assert!(matches!(
            result,
            Err(ConfigError::MissingRuntime { ref action }) if action == "get"
        ));
    }

    #[test]
    fn test_call_with_five_arguments_fails_synchronously() {
        let args = vec![
            ActionArg::Data(json!({})),
            ActionArg::Data(json!({})),
            ActionArg::Callback(Callback::new(|_| {})),
            ActionArg::Callback(Callback::new(|_| {})),
            ActionArg::Callback(Callback::new(|_| {})),
        ];
        let result = cards().call("get", args);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidArgumentCount { count: 5, max: 4, .. })
        ));
    }

    #[test]
    fn test_dropped_request_task_still_marks_placeholder_resolved() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let card = {
            let _guard = runtime.enter();
            cards().get(json!({"cardId": 1})).unwrap()
        };
        assert!(!card.is_resolved());

        // shutting the runtime down drops the request task before it runs
        drop(runtime);
        assert!(card.is_resolved());

        let handle = card.promise().unwrap();
        let other = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let outcome = other.block_on(handle.wait());
        assert!(matches!(outcome, Err(ResourceError::Aborted)));
    }

    #[test]
    fn test_entity_starts_unresolved() {
        let entity = cards().entity(object(json!({"id": 1})));
        assert!(!entity.is_resolved());
        assert!(entity.promise().is_none());
        assert_eq!(entity.get("id"), Some(json!(1)));
    }

    #[test]
    fn test_accept_checks_shape() {
        let action = CompiledAction::compile(
            "query".to_string(),
            ActionDescriptor::new(HttpMethod::Get).array(true),
        )
        .unwrap();
        let response = HttpResponse::new(200, Default::default(), Some(json!({"id": 1})));
        let err = action.accept(response).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::ResponseShapeMismatch {
                expected: Shape::Array,
                actual: Shape::Object,
                ..
            }
        ));

        let response = HttpResponse::new(204, Default::default(), None);
        assert!(action.accept(response).is_ok());
    }

    #[test]
    fn test_accept_applies_transform_first() {
        let action = CompiledAction::compile(
            "query".to_string(),
            ActionDescriptor::new(HttpMethod::Get)
                .array(true)
                .transform_response(|body| body.map(|b| b["items"].clone())),
        )
        .unwrap();
        let response = HttpResponse::new(200, Default::default(), Some(json!({"items": [1, 2]})));
        let accepted = action.accept(response).unwrap();
        assert_eq!(accepted.body, Some(json!([1, 2])));
    }
}
