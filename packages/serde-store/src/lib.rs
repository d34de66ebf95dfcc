//! Serde Integration for permstore
//!
//! This layer provides typed access to permstore stores via serde. It adds:
//! - `TypedReader`: Read directly into Rust types, or as JSON
//! - `TypedWriter`: Write Rust types and JSON documents directly
//! - Value <-> serde conversions
//!
//! Permission checks are unchanged: typed reads see the same
//! permission-filtered data as `read`/`entries`, and typed writes go through
//! the same path resolution as `write`/`write_entries`.
//!
//! # Example
//!
//! ```rust
//! use permstore_core::Store;
//! use permstore_serde::{TypedReader, TypedWriter};
//!
//! let mut store = Store::new();
//! store
//!     .write_entries_json(serde_json::json!({"app": {"name": "demo", "debug": false}}))
//!     .unwrap();
//!
//! let name: String = store.read_as("app:name").unwrap().unwrap();
//! assert_eq!(name, "demo");
//! assert_eq!(store.entries_json()["app"]["debug"], serde_json::json!(false));
//! ```

mod convert;
mod error;
mod typed;

pub use convert::{
    from_value, json_to_value, primitive_to_json, resolved_to_json, to_value, value_to_json,
};
pub use error::Error;
pub use typed::{TypedReader, TypedWriter};

// Re-export core types for convenience
pub use permstore_core::{
    Action, Factory, Input, Map, Permission, PermissionTable, Primitive, Reader, Resolved,
    Store, StoreValue, Value, Writer,
};
