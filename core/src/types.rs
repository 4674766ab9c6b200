//! Namespaced action-type generation.
//!
//! A namespace keeps action types from independently composed reducers apart:
//! `counter` + `increment` becomes `counter/increment`, while the empty
//! namespace leaves short names untouched.
//!
//! # Example
//!
//! ```
//! use compose_reducer_core::create_types;
//!
//! let types = create_types("counter", ["increment", "reset"])?;
//! assert_eq!(&types["increment"], "counter/increment");
//! assert_eq!(types.get("reset"), Some("counter/reset"));
//! # Ok::<(), compose_reducer_core::ArgumentError>(())
//! ```

use crate::error::{ArgumentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Index;

/// Separator between namespace and short name.
pub const DELIMITER: &str = "/";

/// Qualify `short_name` with `namespace`, or return it as-is for the empty namespace.
#[must_use]
pub fn namespaced_action_type(namespace: &str, short_name: &str) -> String {
    if namespace.is_empty() {
        short_name.to_owned()
    } else {
        format!("{namespace}{DELIMITER}{short_name}")
    }
}

/// Mapping from short action name to fully-qualified action type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeMap(BTreeMap<String, String>);

impl TypeMap {
    /// Create an empty map, typically filled with explicit qualified types.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Register `short_name -> qualified`, replacing any previous entry.
    pub fn insert(&mut self, short_name: impl Into<String>, qualified: impl Into<String>) {
        self.0.insert(short_name.into(), qualified.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, short_name: impl Into<String>, qualified: impl Into<String>) -> Self {
        self.insert(short_name, qualified);
        self
    }

    /// Qualified type for `short_name`.
    #[must_use]
    pub fn get(&self, short_name: &str) -> Option<&str> {
        self.0.get(short_name).map(String::as_str)
    }

    /// Whether `short_name` is registered.
    #[must_use]
    pub fn contains(&self, short_name: &str) -> bool {
        self.0.contains_key(short_name)
    }

    /// Number of registered short names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(short name, qualified type)` pairs in short-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Index<&str> for TypeMap {
    type Output = str;

    fn index(&self, short_name: &str) -> &str {
        &self.0[short_name]
    }
}

impl<K, V> FromIterator<(K, V)> for TypeMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Build a [`TypeMap`] qualifying every short name with `namespace`.
///
/// An empty `namespace` means no prefix. Duplicate short names collapse into
/// one entry.
///
/// # Errors
///
/// Returns [`ArgumentErrorKind::MalformedTypes`](crate::ArgumentErrorKind::MalformedTypes)
/// if `types` is empty.
#[track_caller]
pub fn create_types<I, S>(namespace: &str, types: I) -> Result<TypeMap>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let map: TypeMap = types
        .into_iter()
        .map(|short_name| {
            let short_name = short_name.as_ref();
            (short_name.to_owned(), namespaced_action_type(namespace, short_name))
        })
        .collect();

    if map.is_empty() {
        return Err(ArgumentError::malformed_types());
    }
    Ok(map)
}

/// Build a [`TypeMap`] without a namespace; every type maps to itself.
///
/// # Errors
///
/// Returns [`ArgumentErrorKind::MalformedTypes`](crate::ArgumentErrorKind::MalformedTypes)
/// if `types` is empty.
#[track_caller]
pub fn create_unscoped_types<I, S>(types: I) -> Result<TypeMap>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    create_types("", types)
}

/// Build a [`TypeMap`] from loosely typed arguments, e.g. read from JSON.
///
/// Accepts `[namespace, [types...]]` or `[[types...]]`. The namespace must be a
/// string and the types a non-empty array of strings.
///
/// # Errors
///
/// Returns [`ArgumentErrorKind::MalformedTypes`](crate::ArgumentErrorKind::MalformedTypes)
/// for any other shape.
#[track_caller]
pub fn create_types_from_values(args: &[Value]) -> Result<TypeMap> {
    let (namespace, types) = match args {
        [Value::Array(types), ..] => ("", types),
        [Value::String(namespace), Value::Array(types), ..] => (namespace.as_str(), types),
        _ => return Err(ArgumentError::malformed_types()),
    };

    let names: Option<Vec<&str>> = types.iter().map(Value::as_str).collect();
    match names {
        Some(names) => create_types(namespace, names),
        None => Err(ArgumentError::malformed_types()),
    }
}
