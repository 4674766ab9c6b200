//! Reducer composition.
//!
//! This module turns a [`ComposeConfig`] into a single [`ComposedReducer`]:
//! - **Dispatch map**: built once from the registered reducers, keyed by the
//!   fully-qualified action type
//! - **Global reducer**: runs on every action, after the type-specific one
//! - **Shape check**: in development mode, warns when a reduction introduces
//!   top-level keys the initial state does not declare
//!
//! # Examples
//!
//! ## Namespaced reducers
//!
//! ```
//! use compose_reducer_core::{compose_reducer, Action, ComposeConfig};
//! use serde_json::json;
//!
//! let reducer = compose_reducer(
//!     ComposeConfig::new()
//!         .namespace("counter")
//!         .initial_state(json!({ "count": 0 }))
//!         .reducer("increment", |state, _| json!({ "count": state["count"].as_i64().unwrap_or(0) + 1 }))
//!         .patch("reset", json!({ "count": 0 })),
//! )?;
//!
//! let state = reducer.reduce(None, &Action::new("counter/increment"));
//! assert_eq!(state, json!({ "count": 1 }));
//!
//! let state = reducer.reduce(Some(state), &Action::new("counter/reset"));
//! assert_eq!(state, json!({ "count": 0 }));
//! # Ok::<(), compose_reducer_core::ArgumentError>(())
//! ```
//!
//! ## Explicit types
//!
//! ```
//! use compose_reducer_core::{compose_reducer, create_types, Action, ComposeConfig};
//! use serde_json::json;
//!
//! let types = create_types("todos", ["add"])?;
//! let reducer = compose_reducer(
//!     ComposeConfig::new()
//!         .types(types.clone())
//!         .initial_state(json!({ "items": [] }))
//!         .reducer("add", |mut state, action| {
//!             if let (Some(items), Some(text)) = (state["items"].as_array_mut(), action.get("text")) {
//!                 items.push(text.clone());
//!             }
//!             state
//!         }),
//! )?;
//!
//! let state = reducer.reduce(None, &Action::new(&types["add"]).with("text", "ship it"));
//! assert_eq!(state, json!({ "items": ["ship it"] }));
//! # Ok::<(), compose_reducer_core::ArgumentError>(())
//! ```

use crate::action::Action;
use crate::config::{ComposeConfig, GlobalReducer};
use crate::diagnostics::{DEPRECATED_API_WARNING, Diagnostics};
use crate::error::{ArgumentError, Result};
use crate::reducer::{ReducerEntry, ReducerFn};
use crate::types::{TypeMap, namespaced_action_type};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Qualified action type to normalized reducer.
type DispatchMap = HashMap<String, ReducerFn>;

/// Builds composed reducers with a fixed set of diagnostics.
///
/// The build mode is resolved by whoever constructs the composer, not read
/// from the environment during composition.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    diagnostics: Diagnostics,
}

impl Composer {
    /// Composer reporting to `diagnostics`.
    #[must_use]
    pub const fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Composer using the process build mode and `tracing` output.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(Diagnostics::from_env())
    }

    /// The diagnostics handed to every composed reducer.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Validate `config` and build its reducer.
    ///
    /// # Errors
    ///
    /// - [`ArgumentErrorKind::MalformedConfig`](crate::ArgumentErrorKind::MalformedConfig)
    ///   if the initial state is missing or not an object, or a patch is not an object.
    /// - [`ArgumentErrorKind::UnknownActionType`](crate::ArgumentErrorKind::UnknownActionType)
    ///   if explicit types are given and a reducer name is not one of them.
    #[track_caller]
    pub fn compose(&self, config: ComposeConfig) -> Result<ComposedReducer> {
        let ComposeConfig {
            namespace,
            types,
            initial_state,
            reducers,
            malformed_patches,
            global_reducer,
        } = config;

        if !malformed_patches.is_empty() {
            return Err(ArgumentError::malformed_config());
        }
        let Some(initial_state @ Value::Object(_)) = initial_state else {
            return Err(ArgumentError::malformed_config());
        };

        let dispatch = match &types {
            Some(types) => map_from_types(types, reducers)?,
            None => map_from_namespace(&namespace, reducers),
        };

        tracing::debug!(
            action_types = dispatch.len(),
            has_global_reducer = global_reducer.is_some(),
            mode = %self.diagnostics.mode(),
            "Composed reducer"
        );

        Ok(ComposedReducer {
            inner: Arc::new(Inner {
                dispatch,
                initial_state,
                global_reducer: global_reducer.map(|global| global.0),
                diagnostics: self.diagnostics.clone(),
            }),
        })
    }

    /// Positional form of [`compose`](Self::compose).
    ///
    /// Behaves exactly like the equivalent [`ComposeConfig`] call, and reports
    /// one deprecation warning per call in every build mode.
    ///
    /// # Errors
    ///
    /// Same as [`compose`](Self::compose).
    #[deprecated(note = "use `Composer::compose` with a `ComposeConfig`")]
    #[track_caller]
    pub fn compose_legacy<I, S>(
        &self,
        namespace: &str,
        reducers: I,
        initial_state: Value,
        global_reducer: Option<ReducerFn>,
    ) -> Result<ComposedReducer>
    where
        I: IntoIterator<Item = (S, ReducerEntry)>,
        S: Into<String>,
    {
        self.diagnostics.deprecated_api(DEPRECATED_API_WARNING);

        let mut config = ComposeConfig::new()
            .namespace(namespace)
            .initial_state(initial_state);
        for (name, entry) in reducers {
            config = config.entry(name, entry);
        }
        config.global_reducer = global_reducer.map(GlobalReducer);
        self.compose(config)
    }
}

#[track_caller]
fn map_from_types(types: &TypeMap, reducers: BTreeMap<String, ReducerEntry>) -> Result<DispatchMap> {
    let mut dispatch = HashMap::with_capacity(reducers.len());
    for (name, entry) in reducers {
        let Some(action_type) = types.get(&name) else {
            return Err(ArgumentError::unknown_action_type(name));
        };
        dispatch.insert(action_type.to_owned(), entry.normalize());
    }
    Ok(dispatch)
}

fn map_from_namespace(namespace: &str, reducers: BTreeMap<String, ReducerEntry>) -> DispatchMap {
    reducers
        .into_iter()
        .map(|(name, entry)| (namespaced_action_type(namespace, &name), entry.normalize()))
        .collect()
}

/// Compose with [`Composer::from_env`].
///
/// # Errors
///
/// See [`Composer::compose`].
#[track_caller]
pub fn compose_reducer(config: ComposeConfig) -> Result<ComposedReducer> {
    Composer::from_env().compose(config)
}

/// Positional composition with [`Composer::from_env`].
///
/// # Errors
///
/// See [`Composer::compose`].
#[deprecated(note = "use `compose_reducer` with a `ComposeConfig`")]
#[allow(deprecated)]
#[track_caller]
pub fn compose_reducer_legacy<I, S>(
    namespace: &str,
    reducers: I,
    initial_state: Value,
    global_reducer: Option<ReducerFn>,
) -> Result<ComposedReducer>
where
    I: IntoIterator<Item = (S, ReducerEntry)>,
    S: Into<String>,
{
    Composer::from_env().compose_legacy(namespace, reducers, initial_state, global_reducer)
}

/// A reducing function `(state, action) -> state` built by a [`Composer`].
///
/// Holds no mutable state; clones share the same dispatch map.
#[derive(Clone)]
pub struct ComposedReducer {
    inner: Arc<Inner>,
}

struct Inner {
    dispatch: DispatchMap,
    initial_state: Value,
    global_reducer: Option<ReducerFn>,
    diagnostics: Diagnostics,
}

impl ComposedReducer {
    /// Reduce `action` into `state`.
    ///
    /// `None` stands for "no state yet" and is replaced by the initial state.
    /// The matching type-specific reducer runs first, then the global reducer.
    /// If neither applies, `state` is returned unchanged.
    pub fn reduce(&self, state: Option<Value>, action: &Action) -> Value {
        let inner = &*self.inner;
        let mut state = state.unwrap_or_else(|| inner.initial_state.clone());

        if let Some(reduce) = inner.dispatch.get(action.action_type()) {
            tracing::trace!(action_type = action.action_type(), "Running type reducer");
            state = reduce(state, action);
        }
        if let Some(global) = &inner.global_reducer {
            state = global(state, action);
        }

        inner
            .diagnostics
            .check_state_shape(&state, &inner.initial_state, action.action_type());
        state
    }

    /// The declared initial state.
    #[must_use]
    pub fn initial_state(&self) -> &Value {
        &self.inner.initial_state
    }

    /// Whether a type-specific reducer exists for `action_type`.
    #[must_use]
    pub fn handles(&self, action_type: &str) -> bool {
        self.inner.dispatch.contains_key(action_type)
    }

    /// Qualified action types with a type-specific reducer, in no particular order.
    pub fn action_types(&self) -> impl Iterator<Item = &str> {
        self.inner.dispatch.keys().map(String::as_str)
    }

    /// Turn the reducer into a plain closure.
    pub fn into_fn(self) -> impl Fn(Option<Value>, &Action) -> Value + Send + Sync + Clone {
        move |state, action: &Action| self.reduce(state, action)
    }
}

impl fmt::Debug for ComposedReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut action_types: Vec<&str> = self.action_types().collect();
        action_types.sort_unstable();
        f.debug_struct("ComposedReducer")
            .field("action_types", &action_types)
            .field("initial_state", &self.inner.initial_state)
            .field("global_reducer", &self.inner.global_reducer.is_some())
            .field("diagnostics", &self.inner.diagnostics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::diagnostics::{BuildMode, DiagnosticSink};
    use crate::error::ArgumentErrorKind;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counting {
        shape: Mutex<Vec<(String, Vec<String>)>>,
        deprecated: Mutex<usize>,
    }

    impl DiagnosticSink for Counting {
        fn unexpected_keys(&self, action_type: &str, keys: &[String]) {
            self.shape.lock().unwrap().push((action_type.to_owned(), keys.to_vec()));
        }

        fn deprecated_api(&self, _message: &str) {
            *self.deprecated.lock().unwrap() += 1;
        }
    }

    fn composer(mode: BuildMode) -> (Composer, Arc<Counting>) {
        let sink = Arc::new(Counting::default());
        (Composer::new(Diagnostics::new(mode, sink.clone())), sink)
    }

    fn increment(state: Value, _action: &Action) -> Value {
        json!({ "count": state["count"].as_i64().unwrap() + 1 })
    }

    #[test]
    fn undefined_state_uses_initial_state() {
        let (composer, _) = composer(BuildMode::Development);
        let reducer = composer
            .compose(
                ComposeConfig::new()
                    .initial_state(json!({ "count": 0 }))
                    .reducer("increment", increment),
            )
            .unwrap();

        assert_eq!(reducer.reduce(None, &Action::new("increment")), json!({ "count": 1 }));
        assert_eq!(reducer.reduce(Some(json!({ "count": 5 })), &Action::new("unknown")), json!({ "count": 5 }));
    }

    #[test]
    fn namespace_qualifies_reducer_names() {
        let (composer, _) = composer(BuildMode::Development);
        let reducer = composer
            .compose(
                ComposeConfig::new()
                    .namespace("counter")
                    .initial_state(json!({ "count": 0 }))
                    .reducer("increment", increment),
            )
            .unwrap();

        assert!(reducer.handles("counter/increment"));
        assert!(!reducer.handles("increment"));
        assert_eq!(reducer.reduce(None, &Action::new("increment")), json!({ "count": 0 }));
    }

    #[test]
    fn types_resolve_reducer_names() {
        let (composer, _) = composer(BuildMode::Development);
        let reducer = composer
            .compose(
                ComposeConfig::new()
                    .namespace("ignored")
                    .types(TypeMap::new().with("INC", "custom/increment"))
                    .initial_state(json!({ "count": 0 }))
                    .reducer("INC", increment),
            )
            .unwrap();

        assert_eq!(reducer.action_types().collect::<Vec<_>>(), ["custom/increment"]);
    }

    #[test]
    fn unknown_reducer_name_with_types_fails() {
        let (composer, _) = composer(BuildMode::Development);
        let err = composer
            .compose(
                ComposeConfig::new()
                    .types(TypeMap::new().with("INC", "ns/INC"))
                    .initial_state(json!({}))
                    .reducer("NOPE", increment),
            )
            .unwrap_err();

        assert_eq!(err.kind(), &ArgumentErrorKind::UnknownActionType("NOPE".into()));
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn missing_or_non_object_initial_state_fails() {
        let (composer, _) = composer(BuildMode::Development);
        for config in [
            ComposeConfig::new(),
            ComposeConfig::new().initial_state(json!([])),
            ComposeConfig::new().initial_state(json!("state")),
        ] {
            let err = composer.compose(config).unwrap_err();
            assert_eq!(err.kind(), &ArgumentErrorKind::MalformedConfig);
        }
    }

    #[test]
    fn non_object_patch_fails() {
        let (composer, _) = composer(BuildMode::Development);
        let err = composer
            .compose(ComposeConfig::new().initial_state(json!({})).patch("bad", json!(1)))
            .unwrap_err();
        assert_eq!(err.kind(), &ArgumentErrorKind::MalformedConfig);
    }

    #[test]
    fn error_points_at_compose_call() {
        let (composer, _) = composer(BuildMode::Development);
        let line = line!() + 1;
        let err = composer.compose(ComposeConfig::new()).unwrap_err();
        assert_eq!(err.location().line(), line);
    }

    #[test]
    fn global_reducer_runs_after_type_reducer() {
        let (composer, _) = composer(BuildMode::Development);
        let reducer = composer
            .compose(
                ComposeConfig::new()
                    .initial_state(json!({ "count": 0, "log": [] }))
                    .reducer("increment", |mut state, _| {
                        state["count"] = json!(state["count"].as_i64().unwrap() + 1);
                        state
                    })
                    .global_reducer(|mut state, action| {
                        let seen = json!([action.action_type(), state["count"].clone()]);
                        state["log"].as_array_mut().unwrap().push(seen);
                        state
                    }),
            )
            .unwrap();

        let state = reducer.reduce(None, &Action::new("increment"));
        let state = reducer.reduce(Some(state), &Action::new("other"));
        assert_eq!(state["log"], json!([["increment", 1], ["other", 1]]));
    }

    #[test]
    fn shape_warning_only_in_development() {
        for (mode, expected) in [(BuildMode::Development, 1), (BuildMode::Production, 0)] {
            let (composer, sink) = composer(mode);
            let reducer = composer
                .compose(
                    ComposeConfig::new()
                        .initial_state(json!({ "a": 1 }))
                        .reducer("grow", |_, _| json!({ "b": 2, "c": 3 })),
                )
                .unwrap();

            let state = reducer.reduce(None, &Action::new("grow"));
            assert_eq!(state, json!({ "b": 2, "c": 3 }));

            let shape = sink.shape.lock().unwrap();
            assert_eq!(shape.len(), expected);
            if expected == 1 {
                assert_eq!(shape[0], ("grow".to_owned(), vec!["b".to_owned(), "c".to_owned()]));
            }
        }
    }

    #[test]
    fn reduced_state_and_warning_keep_insertion_order() {
        let (composer, sink) = composer(BuildMode::Development);
        let reducer = composer
            .compose(
                ComposeConfig::new()
                    .initial_state(json!({}))
                    .reducer("build", |_, _| json!({ "z": 1, "a": 2 })),
            )
            .unwrap();

        let state = reducer.reduce(None, &Action::new("build"));
        assert_eq!(serde_json::to_string(&state).unwrap(), r#"{"z":1,"a":2}"#);

        let shape = sink.shape.lock().unwrap();
        assert_eq!(shape[0].1, ["z", "a"]);
    }

    #[test]
    #[allow(deprecated)]
    fn legacy_form_matches_config_form_and_warns_once() {
        let (composer, sink) = composer(BuildMode::Production);
        let global: ReducerFn = Arc::new(|mut state: Value, _: &Action| {
            state["touched"] = json!(true);
            state
        });
        let legacy = composer
            .compose_legacy(
                "ns",
                [("inc", ReducerEntry::function(increment))],
                json!({ "count": 0, "touched": false }),
                Some(global),
            )
            .unwrap();
        let modern = composer
            .compose(
                ComposeConfig::new()
                    .namespace("ns")
                    .initial_state(json!({ "count": 0, "touched": false }))
                    .reducer("inc", increment)
                    .global_reducer(|mut state, _| {
                        state["touched"] = json!(true);
                        state
                    }),
            )
            .unwrap();

        let action = Action::new("ns/inc");
        assert_eq!(legacy.reduce(None, &action), modern.reduce(None, &action));
        assert_eq!(*sink.deprecated.lock().unwrap(), 1);
    }

    #[test]
    fn into_fn_behaves_like_reduce() {
        let (composer, _) = composer(BuildMode::Development);
        let reduce = composer
            .compose(ComposeConfig::new().initial_state(json!({ "n": 0 })).patch("one", json!({ "n": 1 })))
            .unwrap()
            .into_fn();
        assert_eq!(reduce(None, &Action::new("one")), json!({ "n": 1 }));
    }
}
