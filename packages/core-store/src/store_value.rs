//! What a store holds, what `write` accepts, and what `read` produces.

use std::fmt;
use std::sync::Arc;

use crate::store::Store;
use crate::traits::Reader;
use crate::value::{Map, Primitive, Value};

/// A value held under a key.
///
/// Structured input never appears here: maps and arrays are normalized into
/// [`StoreValue::Nested`] on write, so every stored value is one of these
/// three shapes.
#[derive(Clone, Debug)]
pub enum StoreValue {
    /// A leaf: string, number, boolean, or null.
    Primitive(Primitive),
    /// A lazily evaluated value, invoked on every read.
    Factory(Factory),
    /// An owned child store.
    ///
    /// Held behind an `Arc` so reads can hand out cheap handles; writes go
    /// through `Arc::make_mut`, so a handle never observes later mutation.
    Nested(Arc<Store>),
}

impl StoreValue {
    pub fn is_null(&self) -> bool {
        matches!(self, StoreValue::Primitive(Primitive::Null))
    }

    pub fn is_store(&self) -> bool {
        matches!(self, StoreValue::Nested(_))
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            StoreValue::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_store(&self) -> Option<&Store> {
        match self {
            StoreValue::Nested(store) => Some(store),
            _ => None,
        }
    }

    pub(crate) fn empty_store() -> Self {
        StoreValue::Nested(Arc::new(Store::new()))
    }
}

impl PartialEq for StoreValue {
    /// Factories compare by identity; stores by content.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StoreValue::Primitive(a), StoreValue::Primitive(b)) => a == b,
            (StoreValue::Factory(a), StoreValue::Factory(b)) => a.ptr_eq(b),
            (StoreValue::Nested(a), StoreValue::Nested(b)) => a == b,
            _ => false,
        }
    }
}

type FactoryFn = dyn Fn() -> Option<Resolved> + Send + Sync;

/// A zero-argument callable stored as a value and invoked on read.
///
/// Returning `None` reads as "undefined". A factory may close over any store
/// handle, including one owned elsewhere in the tree.
///
/// ```rust
/// use permstore_core::{Factory, Primitive, Resolved};
///
/// let answer = Factory::new(|| Some(Resolved::Primitive(Primitive::Integer(42))));
/// assert_eq!(answer.call().and_then(|r| r.into_primitive()), Some(Primitive::Integer(42)));
/// ```
#[derive(Clone)]
pub struct Factory(Arc<FactoryFn>);

impl Factory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Option<Resolved> + Send + Sync + 'static,
    {
        Factory(Arc::new(f))
    }

    /// A factory that always produces the given primitive.
    pub fn constant(value: impl Into<Primitive>) -> Self {
        let value = value.into();
        Factory::new(move || Some(Resolved::Primitive(value.clone())))
    }

    /// Invoke the factory.
    pub fn call(&self) -> Option<Resolved> {
        (self.0)()
    }

    /// Whether both handles point at the same callable.
    pub fn ptr_eq(&self, other: &Factory) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Factory(..)")
    }
}

/// The result of a read, or of invoking a factory.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    /// A primitive, including an explicit null.
    Primitive(Primitive),
    /// A handle to a store.
    Store(Arc<Store>),
}

impl Resolved {
    pub fn is_null(&self) -> bool {
        matches!(self, Resolved::Primitive(Primitive::Null))
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Resolved::Primitive(p) => Some(p),
            Resolved::Store(_) => None,
        }
    }

    pub fn into_primitive(self) -> Option<Primitive> {
        match self {
            Resolved::Primitive(p) => Some(p),
            Resolved::Store(_) => None,
        }
    }

    pub fn as_store(&self) -> Option<&Store> {
        match self {
            Resolved::Store(store) => Some(store),
            Resolved::Primitive(_) => None,
        }
    }

    /// Snapshot this result as plain data. Stores export through `entries()`.
    pub fn to_value(&self) -> Value {
        match self {
            Resolved::Primitive(p) => p.clone().into(),
            Resolved::Store(store) => Value::Map(store.entries()),
        }
    }
}

impl From<Primitive> for Resolved {
    fn from(p: Primitive) -> Self {
        Resolved::Primitive(p)
    }
}

impl From<Store> for Resolved {
    fn from(store: Store) -> Self {
        Resolved::Store(Arc::new(store))
    }
}

impl From<Arc<Store>> for Resolved {
    fn from(store: Arc<Store>) -> Self {
        Resolved::Store(store)
    }
}

/// Anything `write` accepts.
#[derive(Clone, Debug)]
pub enum Input {
    /// Plain data. Primitives are stored as leaves; maps and arrays are
    /// normalized into nested stores.
    Value(Value),
    /// A factory, stored as-is.
    Factory(Factory),
    /// A ready-made store, possibly with its own permission table.
    Store(Arc<Store>),
}

impl Input {
    pub fn is_structured(&self) -> bool {
        matches!(self, Input::Value(v) if v.is_structured())
    }
}

macro_rules! input_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Input {
                fn from(v: $ty) -> Self {
                    Input::Value(v.into())
                }
            }
        )*
    };
}

input_from_value!(Value, Primitive, Map, bool, i32, i64, f64, String, &str);

impl<T: Into<Value>> From<Vec<T>> for Input {
    fn from(v: Vec<T>) -> Self {
        Input::Value(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Input {
    fn from(v: Option<T>) -> Self {
        Input::Value(v.into())
    }
}

impl From<Factory> for Input {
    fn from(f: Factory) -> Self {
        Input::Factory(f)
    }
}

impl From<Store> for Input {
    fn from(store: Store) -> Self {
        Input::Store(Arc::new(store))
    }
}

impl From<Arc<Store>> for Input {
    fn from(store: Arc<Store>) -> Self {
        Input::Store(store)
    }
}
