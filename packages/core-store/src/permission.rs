//! Permissions and the per-key permission table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Access level for a key.
///
/// Serialized as the short literals `"none"`, `"r"`, `"w"` and `"rw"`, and
/// parsed through [`FromStr`] in both text and serde form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Permission {
    None,
    Read,
    Write,
    #[default]
    ReadWrite,
}

impl Permission {
    /// `r` or `rw`.
    pub fn allows_read(self) -> bool {
        matches!(self, Permission::Read | Permission::ReadWrite)
    }

    /// `w` or `rw`.
    pub fn allows_write(self) -> bool {
        matches!(self, Permission::Write | Permission::ReadWrite)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::None => "none",
            Permission::Read => "r",
            Permission::Write => "w",
            Permission::ReadWrite => "rw",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Permission::None),
            "r" => Ok(Permission::Read),
            "w" => Ok(Permission::Write),
            "rw" => Ok(Permission::ReadWrite),
            other => Err(ConfigError::UnknownPermission(other.to_string())),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Permission> for &'static str {
    fn from(permission: Permission) -> Self {
        permission.as_str()
    }
}

/// Static table of per-key permission overrides.
///
/// Built once, before a store is used, and shared by every store of the same
/// shape. Keys absent from the table fall back to the store's default policy.
///
/// # Example
///
/// ```rust
/// use permstore_core::{Permission, PermissionTable};
///
/// let table = PermissionTable::new()
///     .with("id", Permission::Read)
///     .with("password", Permission::Write);
///
/// assert_eq!(table.get("id"), Some(Permission::Read));
/// assert_eq!(table.get("name"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable {
    entries: BTreeMap<String, Permission>,
}

impl PermissionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, permission: Permission) -> Self {
        self.entries.insert(key.into(), permission);
        self
    }

    /// Add or replace an override.
    pub fn insert(&mut self, key: impl Into<String>, permission: Permission) {
        self.entries.insert(key.into(), permission);
    }

    /// The explicit override for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Permission> {
        self.entries.get(key).copied()
    }

    /// The override for `key`, else `default`.
    pub fn effective(&self, key: &str, default: Permission) -> Permission {
        self.get(key).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Permission)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), *p))
    }
}

impl<K: Into<String>> FromIterator<(K, Permission)> for PermissionTable {
    fn from_iter<I: IntoIterator<Item = (K, Permission)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, p)| (k.into(), p)).collect(),
        }
    }
}
