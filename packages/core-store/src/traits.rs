//! Core traits: Reader, Writer.

use crate::error::Error;
use crate::store_value::{Input, Resolved, StoreValue};
use crate::value::Map;

/// Read values from colon-delimited paths.
pub trait Reader {
    /// Resolve a path.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - Nothing is stored at the path ("undefined").
    /// * `Ok(Some(resolved))` - A primitive (possibly null), or a store handle.
    /// * `Err(Error)` - A key along the path denied the read.
    ///
    /// A store handle is a copy-on-write snapshot: it does not observe writes
    /// made through the parent afterwards.
    fn read(&self, path: &str) -> Result<Option<Resolved>, Error>;

    /// Export a deep, permission-filtered snapshot.
    ///
    /// Unreadable keys and factories are left out. Never fails.
    fn entries(&self) -> Map;
}

/// Write values to colon-delimited paths.
pub trait Writer {
    /// Write a value, auto-creating intermediate stores.
    ///
    /// Returns the value now stored at the final key: the assigned leaf, or
    /// the nested store that structured input was normalized into.
    ///
    /// Intermediate stores are created before the read check on each key, so
    /// a denied descent still replaces a non-store value at that key with an
    /// empty store.
    fn write(&mut self, path: &str, value: impl Into<Input>) -> Result<&StoreValue, Error>;

    /// Bulk import a JSON object.
    ///
    /// Not atomic: the first denial is returned and earlier writes stay applied.
    fn write_entries(&mut self, entries: Map) -> Result<(), Error>;
}
