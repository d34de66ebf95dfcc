//! Store configuration: default policy plus the per-key permission table.
//!
//! Hosts that keep their permission rules outside of code load them here,
//! e.g. from a JSON document:
//!
//! ```rust
//! use permstore_core::{Permission, StoreConfig};
//!
//! let config = StoreConfig::from_json(r#"{
//!     "default_policy": "r",
//!     "permissions": { "draft": "rw", "audit": "none" }
//! }"#).unwrap();
//!
//! assert_eq!(config.default_policy, Permission::Read);
//! assert_eq!(config.permissions.get("audit"), Some(Permission::None));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::permission::{Permission, PermissionTable};

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A permission literal other than `none`, `r`, `w` or `rw`.
    #[error("unknown permission '{0}' (expected one of none, r, w, rw)")]
    UnknownPermission(String),

    /// The configuration document could not be parsed.
    #[error("invalid store config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything needed to construct a store's permission registry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Permission for keys without an explicit override. Defaults to `rw`.
    #[serde(default)]
    pub default_policy: Permission,

    /// Per-key overrides.
    #[serde(default)]
    pub permissions: PermissionTable,
}

impl StoreConfig {
    /// Parse a config from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this config as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
