//! Development-time diagnostics.
//!
//! Two non-fatal warnings exist: a reducer produced top-level keys that the
//! initial state does not declare, and the deprecated positional composer was
//! used. Neither ever changes a reduced state. Warnings go to a
//! [`DiagnosticSink`]; the default one logs through `tracing`.
//!
//! The build mode is resolved once and passed explicitly to the
//! [`Composer`](crate::Composer), so tests can exercise both modes side by side.

use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Environment variable selecting the build mode.
pub const BUILD_MODE_ENV_VAR: &str = "APP_ENV";

/// Warning text for the positional composer.
pub const DEPRECATED_API_WARNING: &str = "compose_reducer_legacy: Multiple arguments api is deprecated and will be removed in future versions. Please use ComposeConfig.";

/// Whether development diagnostics are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildMode {
    /// Shape checks run after every reduction.
    #[default]
    Development,
    /// Shape checks are skipped.
    Production,
}

impl BuildMode {
    /// Read the mode from [`BUILD_MODE_ENV_VAR`].
    ///
    /// Only the exact value `production` selects [`BuildMode::Production`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(BUILD_MODE_ENV_VAR).ok().as_deref())
    }

    /// Interpret a raw environment value.
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }

    /// Mode resolved from the environment on first use, then fixed for the process.
    #[must_use]
    pub fn process() -> Self {
        static MODE: OnceLock<BuildMode> = OnceLock::new();
        *MODE.get_or_init(Self::from_env)
    }

    /// Whether shape checks should run.
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Receiver of non-fatal diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// A reduction for `action_type` produced `keys` absent from the initial state.
    fn unexpected_keys(&self, action_type: &str, keys: &[String]);

    /// A deprecated entry point was used.
    fn deprecated_api(&self, message: &str);
}

/// Sink that logs through `tracing` at `WARN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn unexpected_keys(&self, action_type: &str, keys: &[String]) {
        tracing::warn!(
            action_type,
            keys = ?keys,
            "Reducer for action '{}' produced new keys: [{}]",
            action_type,
            keys.join(",")
        );
    }

    fn deprecated_api(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Build mode plus the sink that receives its warnings.
#[derive(Clone)]
pub struct Diagnostics {
    mode: BuildMode,
    sink: Arc<dyn DiagnosticSink>,
}

impl Diagnostics {
    /// Diagnostics for `mode` reported to `sink`.
    pub fn new(mode: BuildMode, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { mode, sink }
    }

    /// Process build mode, logged through `tracing`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(BuildMode::process(), Arc::new(TracingDiagnostics))
    }

    /// The resolved build mode.
    #[must_use]
    pub const fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Report `next` keys missing from `initial`, in development mode only.
    pub fn check_state_shape(&self, next: &Value, initial: &Value, action_type: &str) {
        if !self.mode.is_development() {
            return;
        }
        let keys = new_keys(next, initial);
        if !keys.is_empty() {
            self.sink.unexpected_keys(action_type, &keys);
        }
    }

    /// Report use of a deprecated entry point, regardless of mode.
    pub fn deprecated_api(&self, message: &str) {
        self.sink.deprecated_api(message);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::from_env()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Top-level keys of `next` that `initial` does not have.
///
/// Only additions are reported; keys dropped from `next` are not. Non-object
/// values have no keys.
#[must_use]
pub fn new_keys(next: &Value, initial: &Value) -> Vec<String> {
    let Value::Object(next) = next else {
        return Vec::new();
    };
    let declared = initial.as_object();
    next.keys()
        .filter(|key| !declared.is_some_and(|declared| declared.contains_key(*key)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_exact_production_disables_checks() {
        assert_eq!(BuildMode::from_env_value(Some("production")), BuildMode::Production);
        assert_eq!(BuildMode::from_env_value(Some("Production")), BuildMode::Development);
        assert_eq!(BuildMode::from_env_value(Some("test")), BuildMode::Development);
        assert_eq!(BuildMode::from_env_value(None), BuildMode::Development);
    }

    #[test]
    fn reports_additions_only() {
        let initial = json!({ "a": 1, "b": 2 });
        assert_eq!(new_keys(&json!({ "a": 1, "c": 3, "d": 4 }), &initial), ["c", "d"]);
        assert!(new_keys(&json!({ "a": 1 }), &initial).is_empty());
    }

    #[test]
    fn additions_keep_insertion_order() {
        let next = json!({ "z": 1, "a": 2, "m": 3 });
        assert_eq!(new_keys(&next, &json!({ "m": 0 })), ["z", "a"]);
    }

    #[test]
    fn non_object_state_has_no_keys() {
        assert!(new_keys(&json!(3), &json!({})).is_empty());
        assert_eq!(new_keys(&json!({ "x": 1 }), &json!(null)), ["x"]);
    }
}
