//! Composer configuration.
//!
//! [`ComposeConfig`] is the typed builder. [`ReducerSpec`] is its loosely typed
//! counterpart, deserializable from JSON, for configurations that live outside
//! the code; it can only describe patch reducers; function reducers are added
//! afterwards with the builder.
//!
//! # Example
//!
//! ```
//! use compose_reducer_core::{compose_reducer, Action, ComposeConfig, ReducerSpec};
//! use serde_json::json;
//!
//! let spec: ReducerSpec = serde_json::from_value(json!({
//!     "namespace": "todos",
//!     "initialState": { "items": [], "filter": "all" },
//!     "reducers": { "showDone": { "filter": "done" } }
//! }))?;
//!
//! let config = ComposeConfig::try_from(spec)?
//!     .reducer("clear", |state, _| {
//!         let mut state = state;
//!         state["items"] = json!([]);
//!         state
//!     });
//!
//! let reducer = compose_reducer(config)?;
//! let state = reducer.reduce(None, &Action::new("todos/showDone"));
//! assert_eq!(state["filter"], "done");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::action::Action;
use crate::error::{ArgumentError, Result};
use crate::reducer::{ReducerEntry, ReducerFn, reducer_fn};
use crate::types::TypeMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything needed to compose a reducer.
///
/// `initial_state` is required and must be a JSON object. When `types` is set,
/// reducer names are resolved through it and `namespace` is ignored; otherwise
/// reducer names are qualified with `namespace` (empty by default).
#[derive(Debug, Clone, Default)]
pub struct ComposeConfig {
    pub(crate) namespace: String,
    pub(crate) types: Option<TypeMap>,
    pub(crate) initial_state: Option<Value>,
    pub(crate) reducers: BTreeMap<String, ReducerEntry>,
    pub(crate) malformed_patches: Vec<String>,
    pub(crate) global_reducer: Option<GlobalReducer>,
}

/// Newtype so the config can derive `Debug`.
#[derive(Clone)]
pub(crate) struct GlobalReducer(pub(crate) ReducerFn);

impl std::fmt::Debug for GlobalReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GlobalReducer(<fn>)")
    }
}

impl ComposeConfig {
    /// Empty configuration; `initial_state` still has to be provided.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for reducer names when no explicit type map is given.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Explicit short-name to action-type mapping.
    #[must_use]
    pub fn types(mut self, types: TypeMap) -> Self {
        self.types = Some(types);
        self
    }

    /// Default state, and the reference key set for shape checks.
    #[must_use]
    pub fn initial_state(mut self, state: impl Into<Value>) -> Self {
        self.initial_state = Some(state.into());
        self
    }

    /// Register a function reducer under `name`.
    #[must_use]
    pub fn reducer<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.reducers.insert(name.into(), ReducerEntry::function(f));
        self
    }

    /// Register a partial-state patch under `name`.
    ///
    /// The patch must be a JSON object; anything else makes composition fail.
    #[must_use]
    pub fn patch(mut self, name: impl Into<String>, patch: impl Into<Value>) -> Self {
        let name = name.into();
        match patch.into() {
            Value::Object(map) => {
                self.reducers.insert(name, ReducerEntry::Patch(map));
            },
            _ => self.malformed_patches.push(name),
        }
        self
    }

    /// Register a prepared [`ReducerEntry`] under `name`.
    #[must_use]
    pub fn entry(mut self, name: impl Into<String>, entry: impl Into<ReducerEntry>) -> Self {
        self.reducers.insert(name.into(), entry.into());
        self
    }

    /// Reducer run on every action, after any type-specific reducer.
    #[must_use]
    pub fn global_reducer<F>(mut self, f: F) -> Self
    where
        F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.global_reducer = Some(GlobalReducer(reducer_fn(f)));
        self
    }

    /// Validate a loosely typed [`ReducerSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentErrorKind::MalformedConfig`](crate::ArgumentErrorKind::MalformedConfig)
    /// when `types` is not an object of strings, `namespace` is not a string
    /// (without `types`), `initialState` is not an object, or `reducers` is not
    /// an object of objects.
    #[track_caller]
    pub fn from_spec(spec: ReducerSpec) -> Result<Self> {
        let mut config = Self::new();

        match spec.types {
            Some(Value::Object(types)) => {
                let mut map = TypeMap::new();
                for (short_name, qualified) in types {
                    let Value::String(qualified) = qualified else {
                        return Err(ArgumentError::malformed_config());
                    };
                    map.insert(short_name, qualified);
                }
                config.types = Some(map);
            },
            Some(_) => return Err(ArgumentError::malformed_config()),
            None => match spec.namespace {
                Some(Value::String(namespace)) => config.namespace = namespace,
                None => {},
                Some(_) => return Err(ArgumentError::malformed_config()),
            },
        }

        match spec.initial_state {
            Some(state @ Value::Object(_)) => config.initial_state = Some(state),
            _ => return Err(ArgumentError::malformed_config()),
        }

        match spec.reducers {
            Some(Value::Object(reducers)) => {
                for (name, patch) in reducers {
                    let Value::Object(patch) = patch else {
                        return Err(ArgumentError::malformed_config());
                    };
                    config.reducers.insert(name, ReducerEntry::Patch(patch));
                }
            },
            None => {},
            Some(_) => return Err(ArgumentError::malformed_config()),
        }

        Ok(config)
    }
}

impl TryFrom<ReducerSpec> for ComposeConfig {
    type Error = ArgumentError;

    #[track_caller]
    fn try_from(spec: ReducerSpec) -> Result<Self> {
        Self::from_spec(spec)
    }
}

/// Loosely typed configuration as found in JSON documents.
///
/// Field names follow the `camelCase` JSON convention. Only a missing field is
/// absent; an explicit `null` is present and fails validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducerSpec {
    /// Expected to be a string.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Value>,
    /// Expected to be an object of strings.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub types: Option<Value>,
    /// Expected to be an object.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<Value>,
    /// Expected to be an object of patch objects.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub reducers: Option<Value>,
}

/// Any present field, `null` included, is `Some`; `default` covers missing ones.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
