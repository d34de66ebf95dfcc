//! Typed reader and writer extension traits.

use serde::de::DeserializeOwned;
use serde::Serialize;

use permstore_core::{Reader, StoreValue, Value, Writer};

use crate::convert::{from_value, json_kind, json_to_value, to_value, value_to_json};
use crate::Error;

/// Extension trait for typed reads.
///
/// Automatically implemented for every `Reader`. Primitives deserialize
/// directly; nested stores deserialize from their permission-filtered
/// `entries()` snapshot, so unreadable fields are simply missing.
///
/// # Example
///
/// ```rust
/// use permstore_core::{Store, Writer};
/// use permstore_serde::TypedReader;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// let mut store = Store::new();
/// store.write("server:host", "localhost").unwrap();
/// store.write("server:port", 8080).unwrap();
///
/// let server: Server = store.read_as("server").unwrap().unwrap();
/// assert_eq!(server.port, 8080);
/// ```
pub trait TypedReader: Reader {
    /// Read a path and deserialize it into a Rust type.
    ///
    /// Returns `Ok(None)` when nothing is stored at the path.
    fn read_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let Some(resolved) = self.read(path)? else {
            return Ok(None);
        };
        let typed = from_value(resolved.to_value())?;
        Ok(Some(typed))
    }

    /// Read a path as a serde_json::Value.
    ///
    /// Convenience method when you don't know the exact type.
    fn read_json(&self, path: &str) -> Result<Option<serde_json::Value>, Error> {
        Ok(self.read(path)?.map(|resolved| value_to_json(resolved.to_value())))
    }

    /// Export the permission-filtered snapshot as a JSON object.
    fn entries_json(&self) -> serde_json::Value {
        value_to_json(Value::Map(self.entries()))
    }
}

// Blanket implementation for all Readers
impl<R: Reader + ?Sized> TypedReader for R {}

/// Extension trait for typed writes.
///
/// Automatically implemented for every `Writer`. Structs and maps serialize
/// to structured values, which the store normalizes into nested stores.
///
/// # Example
///
/// ```rust
/// use permstore_core::{Primitive, Reader, Store};
/// use permstore_serde::TypedWriter;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User {
///     name: String,
///     email: String,
/// }
///
/// let mut store = Store::new();
/// let user = User { name: "Ada".into(), email: "ada@example.com".into() };
/// store.write_as("users:ada", &user).unwrap();
///
/// let email = store.read("users:ada:email").unwrap().and_then(|r| r.into_primitive());
/// assert_eq!(email, Some(Primitive::from("ada@example.com")));
/// ```
pub trait TypedWriter: Writer {
    /// Serialize a Rust type and write it to the store.
    fn write_as<T: Serialize>(&mut self, path: &str, data: &T) -> Result<&StoreValue, Error> {
        let value = to_value(data)?;
        Ok(self.write(path, value)?)
    }

    /// Write a serde_json::Value to the store.
    fn write_json(&mut self, path: &str, data: serde_json::Value) -> Result<&StoreValue, Error> {
        Ok(self.write(path, json_to_value(data))?)
    }

    /// Bulk import a JSON object.
    ///
    /// Same non-atomic semantics as `write_entries`: the first denial is
    /// returned and everything written before it stays.
    fn write_entries_json(&mut self, entries: serde_json::Value) -> Result<(), Error> {
        let kind = json_kind(&entries);
        match json_to_value(entries) {
            Value::Map(map) => Ok(self.write_entries(map)?),
            _ => {
                log::debug!("rejecting bulk import of a JSON {}", kind);
                Err(Error::NotAnObject(kind))
            }
        }
    }
}

// Blanket implementation for all Writers
impl<W: Writer> TypedWriter for W {}
