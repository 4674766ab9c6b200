//! Actions dispatched to composed reducers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A message identifying intent by its `type`, with an opaque payload.
///
/// Serializes to the familiar flat shape `{ "type": "...", ...payload }`.
///
/// # Example
///
/// ```
/// use compose_reducer_core::Action;
///
/// let action = Action::new("todos/add").with("text", "write docs");
/// assert_eq!(action.action_type(), "todos/add");
/// assert_eq!(action.get("text").and_then(|v| v.as_str()), Some("write docs"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    action_type: String,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Action {
    /// Create an action with an empty payload.
    #[must_use]
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Map::new(),
        }
    }

    /// Add a payload field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// The fully-qualified action type.
    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Look up a payload field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// All payload fields, excluding `type`.
    #[must_use]
    pub const fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}
