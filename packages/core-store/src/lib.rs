//! permstore core: a permission-gated hierarchical key-value store
//!
//! Every key in a [`Store`] carries a [`Permission`] (`none`, `r`, `w`, `rw`).
//! Paths are colon-delimited (`"users:alice:email"`) and walk through nested
//! stores, checking permissions at each level:
//! - `Store`: the tree node, with its default policy and [`PermissionTable`]
//! - `StoreValue`: what a key holds (primitive, factory, or nested store)
//! - `Value`: JSON-shaped data for bulk import and export
//! - `Reader` / `Writer`: the path operations
//!
//! # Example
//!
//! ```rust
//! use permstore_core::{Permission, Reader, Store, Writer};
//!
//! let mut store = Store::builder()
//!     .permission("secret", Permission::Write)
//!     .build();
//!
//! store.write("settings:theme", "dark").unwrap();
//! store.write("secret", "hunter2").unwrap();
//!
//! let snapshot = store.entries();
//! assert!(snapshot.contains_key("settings"));
//! assert!(!snapshot.contains_key("secret"));
//! assert!(store.read("secret").is_err());
//! ```

mod config;
mod error;
pub mod path;
mod permission;
mod store;
mod store_value;
mod traits;
mod value;

pub use config::{ConfigError, StoreConfig};
pub use error::{Action, Error};
pub use permission::{Permission, PermissionTable};
pub use store::{Store, StoreBuilder};
pub use store_value::{Factory, Input, Resolved, StoreValue};
pub use traits::{Reader, Writer};
pub use value::{Map, Primitive, Value};
