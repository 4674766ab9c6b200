//! # Compose Reducer Core
//!
//! Namespaced action types and declarative reducer composition.
//!
//! ## Core Concepts
//!
//! - **Namespace**: prefix keeping action types of independent reducers apart
//!   (`counter` + `increment` = `counter/increment`)
//! - **Action**: a message with a `type` and an opaque payload
//! - **Reducer**: pure function `(State, Action) → State` over JSON state
//! - **Dispatch map**: qualified action type → reducer, built once at composition
//! - **Global reducer**: runs on every action, after the type-specific reducer
//!
//! Setup errors ([`ArgumentError`]) are raised while composing, never while
//! reducing. In development mode, each reduction is followed by a shape check
//! that warns about top-level keys missing from the initial state.
//!
//! ## Example
//!
//! ```
//! use compose_reducer_core::{compose_reducer, create_types, Action, ComposeConfig};
//! use serde_json::json;
//!
//! let types = create_types("counter", ["increment", "reset"])?;
//!
//! let reducer = compose_reducer(
//!     ComposeConfig::new()
//!         .types(types.clone())
//!         .initial_state(json!({ "count": 0 }))
//!         .reducer("increment", |state, _| {
//!             json!({ "count": state["count"].as_i64().unwrap_or(0) + 1 })
//!         })
//!         .patch("reset", json!({ "count": 0 })),
//! )?;
//!
//! let state = reducer.reduce(None, &Action::new(&types["increment"]));
//! assert_eq!(state, json!({ "count": 1 }));
//! # Ok::<(), compose_reducer_core::ArgumentError>(())
//! ```

pub mod action;
pub mod composition;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod reducer;
pub mod types;

pub use action::Action;
pub use composition::{ComposedReducer, Composer, compose_reducer};
#[allow(deprecated)]
pub use composition::compose_reducer_legacy;
pub use config::{ComposeConfig, ReducerSpec};
pub use diagnostics::{BuildMode, DiagnosticSink, Diagnostics, TracingDiagnostics};
pub use error::{ArgumentError, ArgumentErrorKind, EntryPoint};
pub use reducer::{ReducerEntry, ReducerFn, reducer_fn};
pub use types::{TypeMap, create_types, create_types_from_values, create_unscoped_types};

// Re-export for building states and payloads
pub use serde_json::{Map, Value, json};
