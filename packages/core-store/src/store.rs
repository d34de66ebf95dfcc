//! The permission-gated hierarchical store.
//!
//! A [`Store`] maps keys to [`StoreValue`]s. Every key has an effective
//! [`Permission`]: its entry in the store's [`PermissionTable`], else the
//! store's default policy. Paths like `"a:b:c"` descend through nested stores,
//! checking permissions at each level against the store that owns the key.

use std::sync::Arc;

use indexmap::map::{Entry, IndexMap};

use crate::config::StoreConfig;
use crate::error::{Action, Error};
use crate::path::{self, SEPARATOR};
use crate::permission::{Permission, PermissionTable};
use crate::store_value::{Input, Resolved, StoreValue};
use crate::traits::{Reader, Writer};
use crate::value::{Map, Value};

/// A node in the key-value tree.
///
/// # Example
///
/// ```rust
/// use permstore_core::{Permission, Primitive, Reader, Store, Writer};
///
/// let mut store = Store::builder()
///     .permission("id", Permission::Read)
///     .build();
///
/// store.write("profile:name", "Alice").unwrap();
/// assert_eq!(
///     store.read("profile:name").unwrap().and_then(|r| r.into_primitive()),
///     Some(Primitive::from("Alice")),
/// );
///
/// let err = store.write("id", 7).unwrap_err();
/// assert_eq!(err.to_string(), "You do not have rights to write key id");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Store {
    values: IndexMap<String, StoreValue>,
    default_policy: Permission,
    permissions: Arc<PermissionTable>,
}

impl Store {
    /// Create an empty store with default policy `rw` and no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that consults `permissions` for per-key overrides.
    ///
    /// Pass an `Arc` to share one table between many stores of the same shape.
    pub fn with_permissions(permissions: impl Into<Arc<PermissionTable>>) -> Self {
        Self {
            permissions: permissions.into(),
            ..Self::default()
        }
    }

    /// Create an empty store from a loaded configuration.
    pub fn from_config(config: StoreConfig) -> Self {
        Self {
            values: IndexMap::new(),
            default_policy: config.default_policy,
            permissions: Arc::new(config.permissions),
        }
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    // Permission registry

    /// The permission used for keys without an override.
    pub fn default_policy(&self) -> Permission {
        self.default_policy
    }

    pub fn set_default_policy(&mut self, policy: Permission) {
        self.default_policy = policy;
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    /// Effective permission for `key`: the explicit override, else the default policy.
    pub fn permission(&self, key: &str) -> Permission {
        self.permissions.effective(key, self.default_policy)
    }

    pub fn allowed_to_read(&self, key: &str) -> bool {
        self.permission(key).allows_read()
    }

    pub fn allowed_to_write(&self, key: &str) -> bool {
        self.permission(key).allows_write()
    }

    // Raw local access. None of these check permissions.

    /// The value stored directly under `key`.
    pub fn get(&self, key: &str) -> Option<&StoreValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys held locally, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn write_input(&mut self, path: &str, value: Input) -> Result<&StoreValue, Error> {
        let (key, rest) = path::split(path);

        if let Some(rest) = rest {
            log::trace!("write '{}': descending into '{}'", path, key);
            let child = vivify(key, store_slot(&mut self.values, key));
            // Descent is gated by read permission on the intermediate key, so a
            // caller who cannot read a subtree cannot blindly write into it.
            if !self.permissions.effective(key, self.default_policy).allows_read() {
                return Err(denied(Action::Read, key));
            }
            return Arc::make_mut(child).write_input(rest, value);
        }

        let stored = match value {
            Input::Value(value) => match value.into_primitive() {
                Ok(primitive) => StoreValue::Primitive(primitive),
                Err(structured) => return self.write_structured(key, structured),
            },
            Input::Factory(factory) => StoreValue::Factory(factory),
            Input::Store(store) => StoreValue::Nested(store),
        };

        if !self.allowed_to_write(key) {
            return Err(denied(Action::Write, key));
        }

        log::trace!("write '{}': assigning local value", key);
        let slot = match self.values.entry(key.to_owned()) {
            Entry::Occupied(mut entry) => {
                entry.insert(stored);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(stored),
        };
        Ok(slot)
    }

    /// Normalize a map or array into a nested store at `key`.
    fn write_structured(&mut self, key: &str, structured: Value) -> Result<&StoreValue, Error> {
        log::trace!("write '{}': importing structured value", key);
        let slot = store_slot(&mut self.values, key);
        Arc::make_mut(vivify(key, &mut *slot)).import("", structured.into_pairs())?;
        Ok(slot)
    }

    /// Write every pair under `prefix`, descending into structured values by
    /// extending the prefix. Stops at the first error without rolling back.
    fn import<I>(&mut self, prefix: &str, pairs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (key, value) in pairs {
            let path = format!("{}{}", prefix, key);
            if value.is_structured() {
                let nested_prefix = format!("{}{}", path, SEPARATOR);
                self.import(&nested_prefix, value.into_pairs())?;
            } else {
                self.write_input(&path, Input::Value(value))?;
            }
        }
        Ok(())
    }
}

impl Reader for Store {
    fn read(&self, path: &str) -> Result<Option<Resolved>, Error> {
        let (key, rest) = path::split(path);

        if !self.allowed_to_read(key) {
            return Err(denied(Action::Read, key));
        }

        match (self.values.get(key), rest) {
            (Some(StoreValue::Factory(factory)), rest) => {
                log::trace!("read '{}': invoking factory", key);
                match (factory.call(), rest) {
                    (Some(Resolved::Store(store)), Some(rest)) => store.read(rest),
                    (produced, _) => Ok(produced),
                }
            }
            // Primitives (null included) cannot be descended into; any
            // remaining segments are ignored.
            (Some(StoreValue::Primitive(primitive)), _) => {
                Ok(Some(Resolved::Primitive(primitive.clone())))
            }
            (Some(StoreValue::Nested(store)), Some(rest)) => store.read(rest),
            (Some(StoreValue::Nested(store)), None) => Ok(Some(Resolved::Store(Arc::clone(store)))),
            // Transient and never attached, so reading never mutates the tree.
            (None, Some(rest)) => Store::new().read(rest),
            (None, None) => Ok(None),
        }
    }

    fn entries(&self) -> Map {
        self.values
            .iter()
            .filter(|(key, _)| self.allowed_to_read(key))
            .filter_map(|(key, value)| {
                let exported = match value {
                    StoreValue::Primitive(primitive) => Value::from(primitive.clone()),
                    StoreValue::Nested(store) => Value::Map(store.entries()),
                    StoreValue::Factory(_) => return None,
                };
                Some((key.clone(), exported))
            })
            .collect()
    }
}

impl Writer for Store {
    fn write(&mut self, path: &str, value: impl Into<Input>) -> Result<&StoreValue, Error> {
        self.write_input(path, value.into())
    }

    fn write_entries(&mut self, entries: Map) -> Result<(), Error> {
        self.import("", entries)
    }
}

/// The slot for `key`, holding a new empty store if the key was absent.
fn store_slot<'a>(values: &'a mut IndexMap<String, StoreValue>, key: &str) -> &'a mut StoreValue {
    values.entry(key.to_owned()).or_insert_with(|| {
        log::debug!("auto-creating store at '{}'", key);
        StoreValue::empty_store()
    })
}

/// The store held in `slot`. Anything else in the slot is replaced by an empty store.
fn vivify<'a>(key: &str, slot: &'a mut StoreValue) -> &'a mut Arc<Store> {
    match slot {
        StoreValue::Nested(store) => store,
        _ => {
            log::debug!("replacing non-store value at '{}' with a store", key);
            *slot = StoreValue::empty_store();
            vivify(key, slot)
        }
    }
}

fn denied(action: Action, key: &str) -> Error {
    log::debug!("denied {} on key '{}'", action, key);
    Error::denied(action, key)
}

/// Builder for stores with a default policy and per-key overrides.
///
/// ```rust
/// use permstore_core::{Permission, Store};
///
/// let store = Store::builder()
///     .default_policy(Permission::Read)
///     .permission("inbox", Permission::ReadWrite)
///     .build();
///
/// assert!(!store.allowed_to_write("anything"));
/// assert!(store.allowed_to_write("inbox"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct StoreBuilder {
    default_policy: Permission,
    permissions: PermissionTable,
}

impl StoreBuilder {
    #[must_use]
    pub fn default_policy(mut self, policy: Permission) -> Self {
        self.default_policy = policy;
        self
    }

    /// Override the permission for one key.
    #[must_use]
    pub fn permission(mut self, key: impl Into<String>, permission: Permission) -> Self {
        self.permissions.insert(key, permission);
        self
    }

    /// Replace all overrides with `table`.
    #[must_use]
    pub fn permissions(mut self, table: PermissionTable) -> Self {
        self.permissions = table;
        self
    }

    pub fn build(self) -> Store {
        Store::from_config(StoreConfig {
            default_policy: self.default_policy,
            permissions: self.permissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store_value::Factory;
    use crate::value::Primitive;
    use indexmap::indexmap;

    fn primitive(result: Option<Resolved>) -> Option<Primitive> {
        result.and_then(Resolved::into_primitive)
    }

    #[test]
    fn store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Store>();
    }

    #[test]
    fn default_policy_allows_everything() {
        let store = Store::new();
        assert_eq!(store.default_policy(), Permission::ReadWrite);
        assert!(store.allowed_to_read("anything"));
        assert!(store.allowed_to_write("anything"));
        assert!(store.allowed_to_read(""));
    }

    #[test]
    fn override_beats_default_policy() {
        let mut store = Store::builder()
            .default_policy(Permission::None)
            .permission("open", Permission::ReadWrite)
            .build();
        assert!(store.allowed_to_read("open"));
        assert!(!store.allowed_to_read("closed"));

        store.set_default_policy(Permission::Write);
        assert!(store.allowed_to_write("closed"));
        assert!(!store.allowed_to_read("closed"));
        assert_eq!(store.permission("open"), Permission::ReadWrite);
    }

    #[test]
    fn local_write_and_read() {
        let mut store = Store::new();
        let written = store.write("name", "Alice").unwrap();
        assert_eq!(written.as_primitive(), Some(&Primitive::from("Alice")));
        assert_eq!(
            primitive(store.read("name").unwrap()),
            Some(Primitive::from("Alice"))
        );
    }

    #[test]
    fn overwrite_replaces_value() {
        let mut store = Store::new();
        store.write("v", 1).unwrap();
        store.write("v", 2).unwrap();
        assert_eq!(primitive(store.read("v").unwrap()), Some(Primitive::from(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = Store::new();
        assert_eq!(store.read("nope").unwrap(), None);
        assert_eq!(store.read("nope:deeper:still").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn null_is_distinct_from_absent() {
        let mut store = Store::new();
        store.write("n", Value::Null).unwrap();
        let read = store.read("n").unwrap().unwrap();
        assert!(read.is_null());
        assert!(store.get("n").unwrap().is_null());
    }

    #[test]
    fn primitive_ignores_remaining_segments() {
        let mut store = Store::new();
        store.write("leaf", 5).unwrap();
        assert_eq!(
            primitive(store.read("leaf:child:grandchild").unwrap()),
            Some(Primitive::from(5))
        );

        store.write("nothing", Value::Null).unwrap();
        assert!(store.read("nothing:child").unwrap().unwrap().is_null());
    }

    #[test]
    fn nested_write_auto_creates_stores() {
        let mut store = Store::new();
        store.write("a:b:c", 5).unwrap();

        let a = store.get("a").and_then(StoreValue::as_store).unwrap();
        let b = a.get("b").and_then(StoreValue::as_store).unwrap();
        assert_eq!(b.get("c").and_then(StoreValue::as_primitive), Some(&Primitive::from(5)));
    }

    #[test]
    fn nested_write_replaces_primitive_intermediate() {
        let mut store = Store::new();
        store.write("a", "flat").unwrap();
        store.write("a:b", 1).unwrap();
        assert!(store.get("a").unwrap().is_store());
        assert_eq!(primitive(store.read("a:b").unwrap()), Some(Primitive::from(1)));
    }

    #[test]
    fn nested_write_keeps_existing_siblings() {
        let mut store = Store::new();
        store.write("a:x", 1).unwrap();
        store.write("a:y", 2).unwrap();
        assert_eq!(
            store.entries(),
            indexmap! {
                "a".to_string() => Value::Map(indexmap! {
                    "x".to_string() => Value::from(1),
                    "y".to_string() => Value::from(2),
                }),
            }
        );
    }

    #[test]
    fn read_of_nested_store_returns_handle() {
        let mut store = Store::new();
        store.write("a:b", true).unwrap();
        let handle = store.read("a").unwrap().unwrap();
        let nested = handle.as_store().unwrap();
        assert_eq!(
            primitive(nested.read("b").unwrap()),
            Some(Primitive::from(true))
        );
    }

    #[test]
    fn handles_do_not_observe_later_writes() {
        let mut store = Store::new();
        store.write("a:b", 1).unwrap();
        let handle = store.read("a").unwrap().unwrap();

        store.write("a:b", 2).unwrap();
        let snapshot = handle.as_store().unwrap();
        assert_eq!(primitive(snapshot.read("b").unwrap()), Some(Primitive::from(1)));
        assert_eq!(primitive(store.read("a:b").unwrap()), Some(Primitive::from(2)));
    }

    #[test]
    fn write_descent_is_gated_by_read_permission() {
        let mut store = Store::builder().permission("a", Permission::Write).build();
        let err = store.write("a:b", 1).unwrap_err();
        assert_eq!(err, Error::denied(Action::Read, "a"));
    }

    #[test]
    fn denied_descent_still_replaces_intermediate_value() {
        let mut store = Store::builder().permission("secret", Permission::Write).build();
        store.write("secret", "plain").unwrap();

        let err = store.write("secret:x", 1).unwrap_err();
        assert_eq!(err, Error::denied(Action::Read, "secret"));

        let secret = store.get("secret").and_then(StoreValue::as_store).unwrap();
        assert!(secret.is_empty());
    }

    #[test]
    fn write_descent_allowed_with_read_only() {
        let mut store = Store::builder().permission("a", Permission::Read).build();
        store.write("a:b", 1).unwrap();
        assert_eq!(primitive(store.read("a:b").unwrap()), Some(Primitive::from(1)));
        // The leaf itself still needs write permission.
        assert!(store.write("a", 2).is_err());
    }

    #[test]
    fn nested_stores_check_their_own_table() {
        let guarded = Store::builder().permission("pin", Permission::None).build();
        let mut store = Store::new();
        store.write("vault", guarded).unwrap();

        assert_eq!(
            store.write("vault:pin", 1234).unwrap_err(),
            Error::denied(Action::Write, "pin")
        );
        assert_eq!(
            store.read("vault:pin").unwrap_err(),
            Error::denied(Action::Read, "pin")
        );
        store.write("vault:note", "ok").unwrap();
    }

    #[test]
    fn structured_write_materializes_store() {
        let mut store = Store::new();
        let written = store
            .write("user", Value::Map(indexmap! { "name".to_string() => Value::from("Bob") }))
            .unwrap();
        assert!(written.is_store());
        assert_eq!(
            primitive(store.read("user:name").unwrap()),
            Some(Primitive::from("Bob"))
        );
    }

    #[test]
    fn structured_write_reuses_existing_store() {
        let mut store = Store::new();
        store.write("user:id", 1).unwrap();
        store
            .write("user", Value::Map(indexmap! { "name".to_string() => Value::from("Bob") }))
            .unwrap();
        let user = store.get("user").and_then(StoreValue::as_store).unwrap();
        assert!(user.contains_key("id"));
        assert!(user.contains_key("name"));
    }

    #[test]
    fn structured_write_ignores_leaf_write_permission() {
        let mut store = Store::builder().permission("cfg", Permission::Read).build();
        store
            .write("cfg", Value::Map(indexmap! { "debug".to_string() => Value::from(true) }))
            .unwrap();
        assert_eq!(
            primitive(store.read("cfg:debug").unwrap()),
            Some(Primitive::from(true))
        );
    }

    #[test]
    fn arrays_become_index_keyed_stores() {
        let mut store = Store::new();
        store.write("tags", vec!["x", "y"]).unwrap();
        assert_eq!(
            primitive(store.read("tags:1").unwrap()),
            Some(Primitive::from("y"))
        );
        assert_eq!(
            store.entries(),
            indexmap! {
                "tags".to_string() => Value::Map(indexmap! {
                    "0".to_string() => Value::from("x"),
                    "1".to_string() => Value::from("y"),
                }),
            }
        );
    }

    #[test]
    fn factory_is_invoked_on_read() {
        let mut store = Store::new();
        store.write("answer", Factory::constant(42)).unwrap();
        assert_eq!(
            primitive(store.read("answer").unwrap()),
            Some(Primitive::from(42))
        );
    }

    #[test]
    fn factory_returning_none_reads_as_none() {
        let mut store = Store::new();
        store.write("void", Factory::new(|| None)).unwrap();
        assert_eq!(store.read("void").unwrap(), None);
    }

    #[test]
    fn factory_store_is_descended_into() {
        let mut shared = Store::new();
        shared.write("inner:value", "deep").unwrap();
        let shared = Arc::new(shared);

        let mut store = Store::new();
        let handle = Arc::clone(&shared);
        store
            .write("link", Factory::new(move || Some(Resolved::Store(Arc::clone(&handle)))))
            .unwrap();

        assert_eq!(
            primitive(store.read("link:inner:value").unwrap()),
            Some(Primitive::from("deep"))
        );
        let linked = store.read("link").unwrap().unwrap();
        assert_eq!(linked.as_store(), Some(shared.as_ref()));
    }

    #[test]
    fn factory_primitive_ignores_remaining_segments() {
        let mut store = Store::new();
        store.write("f", Factory::constant("v")).unwrap();
        assert_eq!(
            primitive(store.read("f:more").unwrap()),
            Some(Primitive::from("v"))
        );
    }

    #[test]
    fn factory_needs_read_permission_only_on_its_own_key() {
        let mut store = Store::builder().permission("f", Permission::Write).build();
        store.write("f", Factory::constant(1)).unwrap();
        assert_eq!(
            store.read("f").unwrap_err(),
            Error::denied(Action::Read, "f")
        );
    }

    #[test]
    fn entries_skip_factories_and_unreadable_keys() {
        let mut store = Store::builder().permission("hidden", Permission::Write).build();
        store.write("shown", 1).unwrap();
        store.write("hidden", 2).unwrap();
        store.write("lazy", Factory::constant(3)).unwrap();
        store.write("nothing", Value::Null).unwrap();

        assert_eq!(
            store.entries(),
            indexmap! {
                "nothing".to_string() => Value::Null,
                "shown".to_string() => Value::from(1),
            }
        );
    }

    #[test]
    fn entries_filter_nested_stores_with_their_own_table() {
        let mut store = Store::new();
        store
            .write(
                "account",
                Store::builder().permission("password", Permission::Write).build(),
            )
            .unwrap();
        store.write("account:user", "alice").unwrap();
        store.write("account:password", "hunter2").unwrap();

        assert_eq!(
            store.entries(),
            indexmap! {
                "account".to_string() => Value::Map(indexmap! {
                    "user".to_string() => Value::from("alice"),
                }),
            }
        );
    }

    #[test]
    fn write_entries_nests_by_prefix() {
        let mut store = Store::new();
        store
            .write_entries(indexmap! {
                "a".to_string() => Value::from(1),
                "b".to_string() => Value::Map(indexmap! {
                    "c".to_string() => Value::Null,
                }),
            })
            .unwrap();
        assert_eq!(primitive(store.read("a").unwrap()), Some(Primitive::from(1)));
        assert!(store.read("b:c").unwrap().unwrap().is_null());
    }

    #[test]
    fn write_entries_follows_caller_key_order() {
        let mut store = Store::builder().permission("b", Permission::Read).build();
        let err = store
            .write_entries(indexmap! {
                "c".to_string() => Value::from(3),
                "b".to_string() => Value::from(2),
                "a".to_string() => Value::from(1),
            })
            .unwrap_err();

        assert_eq!(err, Error::denied(Action::Write, "b"));
        assert_eq!(primitive(store.read("c").unwrap()), Some(Primitive::from(3)));
        assert!(!store.contains_key("a"));
    }

    #[test]
    fn keys_and_entries_keep_insertion_order() {
        let mut store = Store::new();
        store.write("zeta", 1).unwrap();
        store.write("alpha", 2).unwrap();
        store.write("mid:x", 3).unwrap();

        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        let exported: Vec<String> = store.entries().into_keys().collect();
        assert_eq!(exported, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn write_entries_skips_empty_objects() {
        let mut store = Store::new();
        store
            .write_entries(indexmap! { "empty".to_string() => Value::map() })
            .unwrap();
        assert!(!store.contains_key("empty"));
    }

    #[test]
    fn write_entries_goes_through_descent_checks() {
        let mut store = Store::builder().permission("locked", Permission::Write).build();
        let err = store
            .write_entries(indexmap! {
                "locked".to_string() => Value::Map(indexmap! { "x".to_string() => Value::from(1) }),
            })
            .unwrap_err();
        assert_eq!(err, Error::denied(Action::Read, "locked"));
    }

    #[test]
    fn empty_segments_are_literal_keys() {
        let mut store = Store::new();
        store.write(":x", 1).unwrap();
        assert!(store.contains_key(""));
        assert_eq!(primitive(store.read(":x").unwrap()), Some(Primitive::from(1)));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn from_config_applies_policy() {
        let config = StoreConfig::from_json(r#"{"default_policy": "r", "permissions": {"w": "rw"}}"#)
            .unwrap();
        let mut store = Store::from_config(config);
        assert!(store.write("other", 1).is_err());
        store.write("w", 1).unwrap();
    }

    #[test]
    fn shared_permission_table() {
        let table = Arc::new(PermissionTable::new().with("id", Permission::Read));
        let a = Store::with_permissions(Arc::clone(&table));
        let b = Store::with_permissions(table);
        assert!(!a.allowed_to_write("id"));
        assert!(!b.allowed_to_write("id"));
        assert_eq!(a.permissions(), b.permissions());
    }
}
