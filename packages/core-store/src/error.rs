//! Error types for the store.
//!
//! The store raises exactly one kind of error: a permission denial. Every
//! other irregularity (missing keys, overwriting a store with a primitive,
//! odd path syntax) is handled permissively and never surfaces here.

use std::fmt;

use thiserror::Error;

/// The action a caller attempted on a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Write,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by store operations.
///
/// Raised synchronously and never caught inside the store; a failure deep in a
/// nested write or a bulk import reaches the caller unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The effective permission for `key` does not allow `action`.
    #[error("You do not have rights to {action} key {key}")]
    PermissionDenied { action: Action, key: String },
}

impl Error {
    /// Create a permission denial for `key`.
    pub fn denied(action: Action, key: impl Into<String>) -> Self {
        Error::PermissionDenied {
            action,
            key: key.into(),
        }
    }

    /// The action that was denied.
    pub fn action(&self) -> Action {
        match self {
            Error::PermissionDenied { action, .. } => *action,
        }
    }

    /// The key whose permission denied the action.
    pub fn key(&self) -> &str {
        match self {
            Error::PermissionDenied { key, .. } => key,
        }
    }
}
