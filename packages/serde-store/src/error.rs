//! Errors for typed access.

use thiserror::Error;

/// Errors from typed reads and writes.
#[derive(Debug, Error)]
pub enum Error {
    /// The store denied the operation.
    #[error(transparent)]
    Store(#[from] permstore_core::Error),

    /// A Rust value could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Stored data could not be deserialized into the requested type.
    #[error("decode error: {0}")]
    Decode(String),

    /// Bulk import needs a JSON object at the top level.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl Error {
    /// The underlying permission denial, if that is what this is.
    pub fn as_store_error(&self) -> Option<&permstore_core::Error> {
        match self {
            Error::Store(e) => Some(e),
            _ => None,
        }
    }
}
