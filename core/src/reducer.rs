//! Reducer entries and their normalization.
//!
//! A reducer is a pure function `(state, action) -> state`. Entries registered
//! with the composer are either such a function or a partial-state patch; both
//! are normalized to a [`ReducerFn`] once, at composition time.

use crate::action::Action;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A shareable reducing function.
pub type ReducerFn = Arc<dyn Fn(Value, &Action) -> Value + Send + Sync>;

/// Wrap a closure as a [`ReducerFn`].
pub fn reducer_fn<F>(f: F) -> ReducerFn
where
    F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A reducer registered for one action type.
#[derive(Clone)]
pub enum ReducerEntry {
    /// Called with the current state and the action.
    Function(ReducerFn),
    /// Shallowly merged over the current state; the action is ignored.
    Patch(Map<String, Value>),
}

impl ReducerEntry {
    /// Function entry from a closure.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
    {
        Self::Function(reducer_fn(f))
    }

    /// Resolve the entry into a callable reducer.
    #[must_use]
    pub fn normalize(self) -> ReducerFn {
        match self {
            Self::Function(f) => f,
            Self::Patch(patch) => reducer_fn(move |state, _action: &Action| merge_patch(state, &patch)),
        }
    }
}

impl fmt::Debug for ReducerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => write!(f, "ReducerEntry::Function(<fn>)"),
            Self::Patch(patch) => f.debug_tuple("ReducerEntry::Patch").field(patch).finish(),
        }
    }
}

impl From<Map<String, Value>> for ReducerEntry {
    fn from(patch: Map<String, Value>) -> Self {
        Self::Patch(patch)
    }
}

impl From<ReducerFn> for ReducerEntry {
    fn from(f: ReducerFn) -> Self {
        Self::Function(f)
    }
}

/// Shallow merge: keys of `patch` win over keys of `state`.
///
/// A non-object `state` contributes no keys.
#[must_use]
pub fn merge_patch(state: Value, patch: &Map<String, Value>) -> Value {
    let mut merged = match state {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn patch_overrides_and_keeps_other_keys() {
        let reduce = ReducerEntry::Patch(patch(json!({ "flag": true }))).normalize();
        let next = reduce(json!({ "flag": false, "other": 1 }), &Action::new("setFlag"));
        assert_eq!(next, json!({ "flag": true, "other": 1 }));
    }

    #[test]
    fn patch_over_non_object_starts_empty() {
        let merged = merge_patch(json!(7), &patch(json!({ "a": 1 })));
        assert_eq!(merged, json!({ "a": 1 }));
    }

    #[test]
    fn function_entry_passes_through() {
        let reduce = ReducerEntry::function(|_, action| json!(action.action_type())).normalize();
        assert_eq!(reduce(Value::Null, &Action::new("x")), json!("x"));
    }
}
