//! # Compose Reducer Testing
//!
//! Testing utilities and helpers for composed reducers.
//!
//! This crate provides:
//! - A recording [`DiagnosticSink`] to count shape and deprecation warnings
//! - A Given-When-Then builder for reducers ([`ReducerTest`])
//! - Assertion helpers for recorded diagnostics
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```
//! use compose_reducer_core::{Action, BuildMode, ComposeConfig};
//! use compose_reducer_testing::{ReducerTest, test_composer};
//! use serde_json::json;
//!
//! let (composer, diagnostics) = test_composer(BuildMode::Development);
//! let reducer = composer
//!     .compose(
//!         ComposeConfig::new()
//!             .initial_state(json!({ "flag": false }))
//!             .patch("setFlag", json!({ "flag": true })),
//!     )
//!     .unwrap();
//!
//! ReducerTest::new(reducer)
//!     .when_action(Action::new("setFlag"))
//!     .then_state(|state| assert_eq!(state["flag"], true))
//!     .run();
//!
//! assert!(diagnostics.recorded().is_empty());
//! ```

use compose_reducer_core::{BuildMode, Composer, DiagnosticSink, Diagnostics};
use std::sync::Arc;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of the diagnostic seam.
pub mod mocks {
    use super::DiagnosticSink;
    use std::sync::{Mutex, PoisonError};

    /// A diagnostic reported to a [`RecordingDiagnostics`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Diagnostic {
        /// A reduction produced keys missing from the initial state.
        UnexpectedKeys {
            /// Action that was reduced.
            action_type: String,
            /// Offending top-level keys.
            keys: Vec<String>,
        },
        /// A deprecated entry point was used.
        DeprecatedApi(String),
    }

    /// Sink that keeps every diagnostic in memory.
    ///
    /// # Example
    ///
    /// ```
    /// use compose_reducer_core::DiagnosticSink;
    /// use compose_reducer_testing::mocks::RecordingDiagnostics;
    ///
    /// let sink = RecordingDiagnostics::default();
    /// sink.unexpected_keys("add", &["extra".to_string()]);
    /// assert_eq!(sink.unexpected_keys_count(), 1);
    /// ```
    #[derive(Debug, Default)]
    pub struct RecordingDiagnostics {
        recorded: Mutex<Vec<Diagnostic>>,
    }

    impl RecordingDiagnostics {
        /// Snapshot of everything recorded so far, oldest first.
        #[must_use]
        pub fn recorded(&self) -> Vec<Diagnostic> {
            self.recorded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of shape warnings.
        #[must_use]
        pub fn unexpected_keys_count(&self) -> usize {
            self.recorded()
                .iter()
                .filter(|d| matches!(d, Diagnostic::UnexpectedKeys { .. }))
                .count()
        }

        /// Number of deprecation warnings.
        #[must_use]
        pub fn deprecation_count(&self) -> usize {
            self.recorded()
                .iter()
                .filter(|d| matches!(d, Diagnostic::DeprecatedApi(_)))
                .count()
        }

        /// Forget everything recorded so far.
        pub fn clear(&self) {
            self.recorded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }

        fn push(&self, diagnostic: Diagnostic) {
            self.recorded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(diagnostic);
        }
    }

    impl DiagnosticSink for RecordingDiagnostics {
        fn unexpected_keys(&self, action_type: &str, keys: &[String]) {
            self.push(Diagnostic::UnexpectedKeys {
                action_type: action_type.to_owned(),
                keys: keys.to_vec(),
            });
        }

        fn deprecated_api(&self, message: &str) {
            self.push(Diagnostic::DeprecatedApi(message.to_owned()));
        }
    }
}

/// Composer for `mode` whose diagnostics are recorded in memory.
#[must_use]
pub fn test_composer(mode: BuildMode) -> (Composer, Arc<mocks::RecordingDiagnostics>) {
    let sink = Arc::new(mocks::RecordingDiagnostics::default());
    let composer = Composer::new(Diagnostics::new(mode, sink.clone()));
    (composer, sink)
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use proptest::prelude::*;
    use serde_json::{Map, Value};

    /// Namespaces, including the empty one.
    pub fn namespaces() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[a-z][a-z0-9-]{0,10}"]
    }

    /// Non-empty lists of distinct short action names.
    pub fn short_names() -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set("[A-Za-z][A-Za-z0-9_]{0,12}", 1..10)
            .prop_map(|names| names.into_iter().collect())
    }

    /// Flat JSON objects with small integer values.
    pub fn flat_objects() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::btree_map("[a-h]", any::<i32>(), 0..6).prop_map(|fields| {
            fields
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect()
        })
    }
}

pub use mocks::{Diagnostic, RecordingDiagnostics};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_counts_by_kind() {
        let sink = RecordingDiagnostics::default();
        sink.unexpected_keys("a", &["x".to_owned()]);
        sink.deprecated_api("old");
        sink.unexpected_keys("b", &["y".to_owned()]);

        assert_eq!(sink.unexpected_keys_count(), 2);
        assert_eq!(sink.deprecation_count(), 1);

        sink.clear();
        assert!(sink.recorded().is_empty());
    }
}
