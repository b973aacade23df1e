//! # Schema Version Compatibility Gate
//!
//! Every schema type declares the version it was published with. A
//! document carrying a `schemaVersion` is accepted only when its major
//! component equals the schema's own major component. Minor, patch and
//! pre-release components are never compared.
//!
//! The gate runs as part of deserialization through
//! [`deserialize_schema_version`], so an incompatible document never
//! produces a value.

use edp_core::{SchemaVersionError, Version};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::index::IndexPolicy;
use crate::shape::Describe;

/// A top-level schema type that knows its own version.
pub trait VersionedSchema: Describe {
    /// Name of the schema type, as exported.
    const NAME: &'static str;

    /// The version this schema type was published with.
    fn expected_version() -> Version {
        Version::current()
    }

    /// Structural policy the schema type must satisfy.
    fn index_policy() -> IndexPolicy {
        IndexPolicy::current()
    }

    /// Parse `supplied` and check it against [`Self::expected_version`].
    ///
    /// # Errors
    ///
    /// - [`SchemaVersionError::InvalidSchemaVersion`] if `supplied` is not
    ///   a semantic version.
    /// - [`SchemaVersionError::VersionMismatch`] if its major component
    ///   differs.
    fn check_schema_version(supplied: &str) -> Result<Version, SchemaVersionError> {
        check_major_version(supplied, &Self::expected_version())
    }

    /// Gate a raw `schemaVersion` JSON value.
    ///
    /// Anything but a string is an invalid schema version, rendered as
    /// JSON in the message.
    fn check_schema_version_value(supplied: &Value) -> Result<Version, SchemaVersionError> {
        match supplied {
            Value::String(text) => Self::check_schema_version(text),
            other => Err(SchemaVersionError::InvalidSchemaVersion {
                value: other.to_string(),
            }),
        }
    }
}

/// Parse `supplied` and require the same major component as `expected`.
pub fn check_major_version(
    supplied: &str,
    expected: &Version,
) -> Result<Version, SchemaVersionError> {
    let version =
        Version::parse(supplied).map_err(|_| SchemaVersionError::InvalidSchemaVersion {
            value: supplied.to_string(),
        })?;
    if !version.is_compatible_with(expected) {
        return Err(SchemaVersionError::VersionMismatch {
            supplied: supplied.to_string(),
            expected_major: expected.major(),
        });
    }
    Ok(version)
}

/// Deserialize and gate a `schemaVersion` field for schema type `S`.
///
/// Only strings are accepted. Any other JSON value is rejected as an
/// invalid schema version, rendered as JSON in the message.
pub fn deserialize_schema_version<'de, S, D>(deserializer: D) -> Result<Version, D::Error>
where
    S: VersionedSchema,
    D: Deserializer<'de>,
{
    let supplied = Value::deserialize(deserializer)?;
    S::check_schema_version_value(&supplied).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{field, RecordShape, TypeShape};
    use serde::Deserialize;

    struct Pinned;

    impl Describe for Pinned {
        fn shape() -> TypeShape {
            TypeShape::Record(RecordShape::new("Pinned", "", || {
                vec![field::<Version>("schemaVersion", "")]
            }))
        }
    }

    impl VersionedSchema for Pinned {
        const NAME: &'static str = "Pinned";

        fn expected_version() -> Version {
            Version::new(2, 3, 0)
        }
    }

    #[derive(Debug, Deserialize)]
    struct Document {
        #[serde(rename = "schemaVersion", deserialize_with = "pinned_version")]
        schema_version: Version,
    }

    fn pinned_version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Version, D::Error> {
        deserialize_schema_version::<Pinned, D>(deserializer)
    }

    #[test]
    fn test_same_major_is_accepted() {
        for supplied in ["2.0.0", "2.3.0", "2.99.1", "2.0.0-rc.1", "2.1.0+build.7"] {
            let version = Pinned::check_schema_version(supplied).unwrap();
            assert_eq!(version.major(), 2, "{supplied}");
        }
    }

    #[test]
    fn test_other_major_is_rejected() {
        let err = Pinned::check_schema_version("3.0.0").unwrap_err();
        assert_eq!(
            err,
            SchemaVersionError::VersionMismatch {
                supplied: "3.0.0".to_string(),
                expected_major: 2,
            }
        );
        assert_eq!(
            err.to_string(),
            "schemaVersion 3.0.0 does not match expected major version '2'"
        );
    }

    #[test]
    fn test_unparseable_is_invalid() {
        for supplied in ["", "two", "2", "2.0", "v2.0.0"] {
            let err = Pinned::check_schema_version(supplied).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid schema version '{supplied}'"));
        }
    }

    #[test]
    fn test_deserializer_gates_strings() {
        let doc: Document = serde_json::from_str(r#"{"schemaVersion": "2.8.1"}"#).unwrap();
        assert_eq!(doc.schema_version, Version::new(2, 8, 1));

        let err = serde_json::from_str::<Document>(r#"{"schemaVersion": "1.0.0"}"#).unwrap_err();
        assert!(err
            .to_string()
            .contains("schemaVersion 1.0.0 does not match expected major version '2'"));
    }

    #[test]
    fn test_deserializer_rejects_non_strings() {
        let err = serde_json::from_str::<Document>(r#"{"schemaVersion": 2}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid schema version '2'"), "{err}");

        let err = serde_json::from_str::<Document>(r#"{"schemaVersion": null}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid schema version 'null'"), "{err}");
    }

    #[test]
    fn test_value_gate_returns_typed_errors() {
        let version = Pinned::check_schema_version_value(&Value::from("2.1.0")).unwrap();
        assert_eq!(version, Version::new(2, 1, 0));

        assert!(matches!(
            Pinned::check_schema_version_value(&Value::from("4.0.0")),
            Err(SchemaVersionError::VersionMismatch { expected_major: 2, .. })
        ));
        assert_eq!(
            Pinned::check_schema_version_value(&Value::Bool(true)),
            Err(SchemaVersionError::InvalidSchemaVersion {
                value: "true".to_string()
            })
        );
    }

    #[test]
    fn test_default_policy_is_current() {
        assert_eq!(Pinned::index_policy(), IndexPolicy::current());
    }
}
