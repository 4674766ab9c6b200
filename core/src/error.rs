//! Argument errors raised while building type maps and composing reducers.
//!
//! Every error is raised synchronously at setup time, never while reducing.
//! Each one remembers which public entry point rejected its arguments and the
//! caller's source location (captured with `#[track_caller]`), so the report
//! points at the call site instead of internal helpers.

use std::fmt;
use std::panic::Location;
use thiserror::Error;

/// Message used when the namespacer receives malformed arguments.
pub const CREATE_TYPES_ARGUMENT_MESSAGE: &str = "Expected first argument to be a string (for namespaced actions) or non empty array (types)or/and second argument (types) to be a non empty array.";

/// Message used when the composer receives a malformed configuration.
pub const COMPOSE_REDUCER_ARGUMENT_MESSAGE: &str = "As argument expected object of shape : {
  namespace: 'string',
  types: 'object',
  initialState: 'object',
  reducers: 'object',
  globalReducer: 'function'
}.
Required keys: namespace or types, initialState.";

/// Public entry point that rejected its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// [`create_types`](crate::types::create_types) and its variants.
    CreateTypes,
    /// [`compose_reducer`](crate::composition::compose_reducer) and its variants.
    ComposeReducer,
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTypes => write!(f, "create_types"),
            Self::ComposeReducer => write!(f, "compose_reducer"),
        }
    }
}

/// What was wrong with the arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentErrorKind {
    /// Namespace was not a string, or the type list was missing or empty.
    #[error("{}", CREATE_TYPES_ARGUMENT_MESSAGE)]
    MalformedTypes,

    /// Composer configuration did not have the expected shape.
    #[error("{}", COMPOSE_REDUCER_ARGUMENT_MESSAGE)]
    MalformedConfig,

    /// A reducer was registered under a name missing from the explicit type map.
    #[error("There is no '{0}' action type.")]
    UnknownActionType(String),
}

/// Error raised by the namespacer or the composer for malformed arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct ArgumentError {
    kind: ArgumentErrorKind,
    entry_point: EntryPoint,
    location: &'static Location<'static>,
}

impl ArgumentError {
    /// Build an error attributed to `entry_point`, located at the caller.
    ///
    /// Called from `#[track_caller]` entry points, the location resolves to the
    /// user's call site.
    #[must_use]
    #[track_caller]
    pub fn new(kind: ArgumentErrorKind, entry_point: EntryPoint) -> Self {
        Self {
            kind,
            entry_point,
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub(crate) fn malformed_types() -> Self {
        Self::new(ArgumentErrorKind::MalformedTypes, EntryPoint::CreateTypes)
    }

    #[track_caller]
    pub(crate) fn malformed_config() -> Self {
        Self::new(ArgumentErrorKind::MalformedConfig, EntryPoint::ComposeReducer)
    }

    #[track_caller]
    pub(crate) fn unknown_action_type(name: impl Into<String>) -> Self {
        Self::new(
            ArgumentErrorKind::UnknownActionType(name.into()),
            EntryPoint::ComposeReducer,
        )
    }

    /// The reason the arguments were rejected.
    #[must_use]
    pub const fn kind(&self) -> &ArgumentErrorKind {
        &self.kind
    }

    /// Entry point that raised the error.
    #[must_use]
    pub const fn entry_point(&self) -> EntryPoint {
        self.entry_point
    }

    /// Source location of the offending call.
    #[must_use]
    pub const fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// Result alias for setup-time operations.
pub type Result<T> = std::result::Result<T, ArgumentError>;
