//! # Semantic Versions
//!
//! Defines [`Version`], the semantic version carried by every Extended
//! Dataset Profile in its `schemaVersion` field, and [`CURRENT_VERSION`],
//! the version of the schema shipped by this workspace.
//!
//! ## Compatibility Rule
//!
//! Two versions are *schema-compatible* iff their major components are
//! equal. Minor, patch and pre-release differences are never checked.
//!
//! ## Wire Format
//!
//! Versions serialize as their canonical string (`MAJOR.MINOR.PATCH`
//! with optional `-PRERELEASE` and `+BUILD`). Parsing the serialized form
//! always yields an equal value; byte-for-byte preservation of the input
//! is not guaranteed.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VersionError;

/// Version of the schema defined by this workspace.
///
/// Derived from the package version at compile time.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A semantic version with semver precedence rules.
///
/// Equality and ordering follow semver precedence: numeric
/// major/minor/patch first, then pre-release identifiers. Build metadata
/// is kept for display but never compared, so `1.0.0+a == 1.0.0+b`.
#[derive(Debug, Clone)]
pub struct Version(semver::Version);

impl Version {
    /// Build a release version from its numeric components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parse a version string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::InvalidVersionFormat`] if `input` is not
    /// accepted by the semantic versioning grammar.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        semver::Version::parse(input)
            .map(Self)
            .map_err(|e| VersionError::InvalidVersionFormat {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// The version of the schema shipped by this workspace.
    pub fn current() -> Self {
        // The package version is validated by cargo, so the fallback only
        // guards against a tampered build environment.
        Self::parse(CURRENT_VERSION).unwrap_or_else(|_| {
            Self(semver::Version {
                build: semver::BuildMetadata::new("dirty").unwrap_or(semver::BuildMetadata::EMPTY),
                ..semver::Version::new(0, 0, 0)
            })
        })
    }

    /// Leading numeric component.
    pub fn major(&self) -> u64 {
        self.0.major
    }

    /// Second numeric component.
    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Third numeric component.
    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Pre-release identifiers, empty for release versions.
    pub fn pre_release(&self) -> &str {
        self.0.pre.as_str()
    }

    /// Build metadata, empty when absent.
    pub fn build(&self) -> &str {
        self.0.build.as_str()
    }

    /// Whether `other` shares this version's major component.
    pub fn is_compatible_with(&self, other: &Version) -> bool {
        self.major() == other.major()
    }

    /// Access the underlying `semver::Version`.
    pub fn as_semver(&self) -> &semver::Version {
        &self.0
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.major.hash(state);
        self.0.minor.hash(state);
        self.0.patch.hash(state);
        self.0.pre.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_precedence(&other.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<semver::Version> for Version {
    fn from(v: semver::Version) -> Self {
        Self(v)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
