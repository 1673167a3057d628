//! Positional arguments of action invocations.
//!
//! Actions take up to four positional arguments whose meaning depends on how
//! many there are and which of them are callbacks. [`ActionArg`] lists the
//! accepted forms.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::HttpResponse;
use crate::error::ConfigError;
use crate::rest::entity::Resolved;
use crate::rest::errors::ResourceError;

/// Maximum number of arguments of a resource-level call.
pub const MAX_ARGS: usize = 4;

/// Maximum number of arguments of an entity-level call.
pub const MAX_INSTANCE_ARGS: usize = 3;

/// What a callback is told when an action settles.
#[derive(Debug)]
pub enum Outcome<'a> {
    /// The action succeeded.
    Success {
        /// The resolved value.
        value: &'a Resolved,
        /// The response the value came from.
        response: &'a HttpResponse,
    },
    /// The action failed.
    Failure(&'a ResourceError),
}

/// A success or error callback.
///
/// The same type fills both slots; its position decides when it runs.
///
/// # Example
///
/// ```rust
/// use wp_resource::rest::{Callback, Outcome};
///
/// let on_error = Callback::new(|outcome| {
///     if let Outcome::Failure(error) = outcome {
///         eprintln!("request failed: {error}");
///     }
/// });
/// # let _ = on_error;
/// ```
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(Outcome<'_>) + Send + Sync>);

impl Callback {
    /// Wraps a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Outcome<'_>) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wraps a function that only cares about successes.
    pub fn on_success<F>(f: F) -> Self
    where
        F: Fn(&Resolved, &HttpResponse) + Send + Sync + 'static,
    {
        Self::new(move |outcome| {
            if let Outcome::Success { value, response } = outcome {
                f(value, response);
            }
        })
    }

    /// Wraps a function that only cares about failures.
    pub fn on_error<F>(f: F) -> Self
    where
        F: Fn(&ResourceError) + Send + Sync + 'static,
    {
        Self::new(move |outcome| {
            if let Outcome::Failure(error) = outcome {
                f(error);
            }
        })
    }

    pub(crate) fn call(&self, outcome: Outcome<'_>) {
        (self.0)(outcome);
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// A positional argument: JSON data or a callback.
///
/// Resource-level calls accept these forms:
///
/// | Arguments                     | Meaning                                     |
/// |-------------------------------|---------------------------------------------|
/// | `()`                          | nothing                                     |
/// | `(cb)`                        | success                                     |
/// | `(data)`                      | body if the action sends one, else params   |
/// | `(cb, cb)`                    | success, error                              |
/// | `(data, cb)`                  | body-or-params, success                     |
/// | `(data, cb, cb)`              | body-or-params, success, error              |
/// | `(params, data)`              | params, body                                |
/// | `(params, data, cb)`          | params, body, success                       |
/// | `(params, data, cb, cb)`      | params, body, success, error                |
///
/// Entity-level calls take `(params?, success?, error?)`.
#[derive(Clone, Debug)]
pub enum ActionArg {
    /// Parameters or a body, depending on position.
    Data(Value),
    /// A success or error callback, depending on position.
    Callback(Callback),
}

impl ActionArg {
    const fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }
}

impl From<Value> for ActionArg {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<Map<String, Value>> for ActionArg {
    fn from(map: Map<String, Value>) -> Self {
        Self::Data(Value::Object(map))
    }
}

impl From<Callback> for ActionArg {
    fn from(callback: Callback) -> Self {
        Self::Callback(callback)
    }
}

/// Arguments sorted into their roles.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub(crate) params: Map<String, Value>,
    pub(crate) data: Option<Value>,
    pub(crate) success: Option<Callback>,
    pub(crate) error: Option<Callback>,
}

struct Slots<'a> {
    action: &'a str,
    args: Vec<Option<ActionArg>>,
}

impl Slots<'_> {
    fn is_callback(&self, index: usize) -> bool {
        self.args
            .get(index)
            .and_then(Option::as_ref)
            .is_some_and(ActionArg::is_callback)
    }

    fn take(&mut self, index: usize) -> Option<ActionArg> {
        self.args.get_mut(index).and_then(Option::take)
    }

    fn callback(&mut self, index: usize) -> Result<Option<Callback>, ConfigError> {
        match self.take(index) {
            None | Some(ActionArg::Data(Value::Null)) => Ok(None),
            Some(ActionArg::Callback(callback)) => Ok(Some(callback)),
            Some(ActionArg::Data(_)) => Err(self.invalid(index, "a callback")),
        }
    }

    fn params(&mut self, index: usize) -> Result<Map<String, Value>, ConfigError> {
        match self.take(index) {
            None | Some(ActionArg::Data(Value::Null)) => Ok(Map::new()),
            Some(ActionArg::Data(Value::Object(map))) => Ok(map),
            Some(_) => Err(self.invalid(index, "an object of parameters")),
        }
    }

    fn data(&mut self, index: usize) -> Result<Option<Value>, ConfigError> {
        match self.take(index) {
            None => Ok(None),
            Some(ActionArg::Data(value)) => Ok(Some(value)),
            Some(ActionArg::Callback(_)) => Err(self.invalid(index, "data")),
        }
    }

    fn invalid(&self, index: usize, expected: &'static str) -> ConfigError {
        ConfigError::InvalidArgument {
            action: self.action.to_string(),
            position: index + 1,
            expected,
        }
    }
}

/// Sorts the arguments of a resource-level call.
pub(crate) fn parse_class_args(
    action: &str,
    has_body: bool,
    args: Vec<ActionArg>,
) -> Result<ParsedArgs, ConfigError> {
    let count = args.len();
    if count > MAX_ARGS {
        return Err(ConfigError::InvalidArgumentCount {
            action: action.to_string(),
            count,
            max: MAX_ARGS,
        });
    }

    let mut slots = Slots {
        action,
        args: args.into_iter().map(Some).collect(),
    };
    let mut parsed = ParsedArgs::default();

    if count == 0 {
        return Ok(parsed);
    }

    if count >= 2 {
        if !slots.is_callback(1) {
            parsed.params = slots.params(0)?;
            parsed.data = slots.data(1)?;
            parsed.success = slots.callback(2)?;
            parsed.error = slots.callback(3)?;
            return Ok(parsed);
        }

        if slots.is_callback(0) {
            parsed.success = slots.callback(0)?;
            parsed.error = slots.callback(1)?;
            if count > 2 {
                return Err(slots.invalid(2, "absent after the success and error callbacks"));
            }
            return Ok(parsed);
        }

        parsed.success = slots.callback(1)?;
        parsed.error = slots.callback(2)?;
        if count == MAX_ARGS {
            return Err(slots.invalid(3, "absent when the second argument is a callback"));
        }
    }

    // a lone first argument: success callback, body, or params
    if slots.is_callback(0) {
        parsed.success = slots.callback(0)?;
    } else if has_body {
        parsed.data = slots.data(0)?;
    } else {
        parsed.params = slots.params(0)?;
    }
    Ok(parsed)
}

/// Sorts the arguments of an entity-level call: `(params?, success?, error?)`.
pub(crate) fn parse_instance_args(
    action: &str,
    args: Vec<ActionArg>,
) -> Result<ParsedArgs, ConfigError> {
    let count = args.len();
    if count > MAX_INSTANCE_ARGS {
        return Err(ConfigError::InvalidArgumentCount {
            action: action.to_string(),
            count,
            max: MAX_INSTANCE_ARGS,
        });
    }

    let mut slots = Slots {
        action,
        args: args.into_iter().map(Some).collect(),
    };
    let mut parsed = ParsedArgs::default();

    if slots.is_callback(0) {
        // no params: everything shifts one slot left
        parsed.success = slots.callback(0)?;
        parsed.error = slots.callback(1)?;
        if count == MAX_INSTANCE_ARGS {
            return Err(slots.invalid(2, "absent when the first argument is a callback"));
        }
    } else {
        parsed.params = slots.params(0)?;
        parsed.success = slots.callback(1)?;
        parsed.error = slots.callback(2)?;
    }
    Ok(parsed)
}
