//! # Schema Registry
//!
//! A fixed table mapping each published [`SchemaVersion`] key to exactly
//! one concrete schema type. The table is built from function pointers
//! only, so entries are `Copy + Send + Sync` and can be shared freely.
//!
//! The *current* schema is the entry whose major version equals the
//! major version of this package.

use std::fmt;
use std::str::FromStr;

use edp_core::{ValidationError, Version};
use serde::{Deserialize, Serialize};

use crate::compat::VersionedSchema;
use crate::index::{IndexPolicy, StaticIndexValidator, StructuralViolation};
use crate::models::v0;
use crate::shape::TypeShape;

/// Registry key of a published schema revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// First published revision.
    #[serde(rename = "v0")]
    V0,
}

impl SchemaVersion {
    /// All registered keys, oldest first.
    pub const ALL: &'static [SchemaVersion] = &[Self::V0];

    /// Wire form of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V0 => "v0",
        }
    }

    /// Major version served under this key.
    pub fn major(&self) -> u64 {
        match self {
            Self::V0 => 0,
        }
    }

    /// The key matching this package's major version.
    ///
    /// Falls back to the newest key if no key matches, which can only
    /// happen when the package version is bumped without registering a
    /// new revision.
    pub fn current() -> Self {
        let major = Version::current().major();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.major() == major)
            .unwrap_or(Self::V0)
    }

    /// The registry entry for this key.
    pub fn entry(&self) -> SchemaEntry {
        match self {
            Self::V0 => SchemaEntry::of::<v0::ExtendedDatasetProfile>(*self),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                type_name: "SchemaVersion",
                value: s.to_string(),
            })
    }
}

/// A registered schema type, erased to its capabilities.
#[derive(Clone, Copy)]
pub struct SchemaEntry {
    /// Registry key.
    pub version: SchemaVersion,
    /// Schema type name.
    pub name: &'static str,
    shape: fn() -> TypeShape,
    expected_version: fn() -> Version,
    index_policy: fn() -> IndexPolicy,
}

impl SchemaEntry {
    /// Erase schema type `S` into an entry under `version`.
    pub fn of<S: VersionedSchema>(version: SchemaVersion) -> Self {
        Self {
            version,
            name: S::NAME,
            shape: S::shape,
            expected_version: S::expected_version,
            index_policy: S::index_policy,
        }
    }

    /// Shape of the schema type.
    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }

    /// Version the schema type declares for itself.
    pub fn expected_version(&self) -> Version {
        (self.expected_version)()
    }

    /// Structural policy of the schema type.
    pub fn index_policy(&self) -> IndexPolicy {
        (self.index_policy)()
    }

    /// Run the static indexability validator under the entry's own policy.
    pub fn check_indexable(&self) -> Result<(), StructuralViolation> {
        StaticIndexValidator::new(self.index_policy()).validate(&self.shape())
    }
}

impl fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish()
    }
}

/// Look up the entry registered under `version`.
pub fn schema_entry(version: SchemaVersion) -> SchemaEntry {
    let entry = version.entry();
    tracing::debug!(%version, schema = entry.name, "resolved schema entry");
    entry
}

/// The entry for this package's major version.
pub fn current_schema() -> SchemaEntry {
    schema_entry(SchemaVersion::current())
}

/// Every registered entry, oldest first.
pub fn registered_schemas() -> Vec<SchemaEntry> {
    SchemaVersion::ALL.iter().map(|v| schema_entry(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form() {
        assert_eq!(SchemaVersion::V0.to_string(), "v0");
        assert_eq!("v0".parse::<SchemaVersion>().unwrap(), SchemaVersion::V0);
        assert_eq!(serde_json::to_string(&SchemaVersion::V0).unwrap(), "\"v0\"");
        let parsed: SchemaVersion = serde_json::from_str("\"v0\"").unwrap();
        assert_eq!(parsed, SchemaVersion::V0);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = "v9".parse::<SchemaVersion>().unwrap_err();
        assert_eq!(err.to_string(), "'v9' is not a valid SchemaVersion");
        assert!(serde_json::from_str::<SchemaVersion>("\"V0\"").is_err());
    }

    #[test]
    fn test_current_matches_package_major() {
        assert_eq!(SchemaVersion::current().major(), Version::current().major());
        let entry = current_schema();
        assert_eq!(entry.version, SchemaVersion::current());
        assert_eq!(entry.expected_version().major(), entry.version.major());
    }

    #[test]
    fn test_every_key_is_registered_once() {
        let entries = registered_schemas();
        assert_eq!(entries.len(), SchemaVersion::ALL.len());
        for (entry, key) in entries.iter().zip(SchemaVersion::ALL) {
            assert_eq!(entry.version, *key);
        }
    }

    #[test]
    fn test_v0_maps_to_extended_dataset_profile() {
        let entry = schema_entry(SchemaVersion::V0);
        assert_eq!(entry.name, "ExtendedDatasetProfile");
        assert_eq!(entry.shape().to_string(), "ExtendedDatasetProfile");
    }

    #[test]
    fn test_entries_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaEntry>();
        assert_send_sync::<SchemaVersion>();
    }
}
