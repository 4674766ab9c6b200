//! Counter demo
//!
//! A namespaced counter reducer built from a JSON spec (patch reducers) plus
//! function reducers added in code.

use compose_reducer_core::{
    Action, ArgumentError, ComposeConfig, ComposedReducer, Composer, ReducerSpec, TypeMap, Value,
    create_types, json,
};

/// Namespace of every counter action.
pub const NAMESPACE: &str = "counter";

/// Patch reducers and initial state, as they would appear in a config file.
pub const COUNTER_SPEC: &str = r#"{
    "initialState": { "count": 0, "step": 1 },
    "reducers": {
        "reset": { "count": 0 },
        "double_step": { "step": 2 }
    }
}"#;

/// Qualified counter action types.
///
/// # Errors
///
/// Propagates [`create_types`] errors.
pub fn counter_types() -> Result<TypeMap, ArgumentError> {
    create_types(NAMESPACE, ["increment", "decrement", "reset", "double_step"])
}

/// Build the counter reducer with `composer`.
///
/// # Errors
///
/// Returns an error if [`COUNTER_SPEC`] is not valid JSON or does not have the
/// expected shape.
pub fn counter_reducer(composer: &Composer) -> Result<ComposedReducer, Box<dyn std::error::Error>> {
    let spec: ReducerSpec = serde_json::from_str(COUNTER_SPEC)?;
    let config = ComposeConfig::try_from(spec)?
        .types(counter_types()?)
        .reducer("increment", |state, _| step(state, 1))
        .reducer("decrement", |state, _| step(state, -1))
        .global_reducer(|state, action| {
            tracing::info!(action_type = action.action_type(), count = %state["count"], "Reduced");
            state
        });
    Ok(composer.compose(config)?)
}

/// Shorthand for an action of the counter namespace.
#[must_use]
pub fn action(short_name: &str) -> Action {
    Action::new(format!("{NAMESPACE}/{short_name}"))
}

fn step(mut state: Value, direction: i64) -> Value {
    let count = state["count"].as_i64().unwrap_or(0);
    let step = state["step"].as_i64().unwrap_or(1);
    state["count"] = json!(count + direction * step);
    state
}
