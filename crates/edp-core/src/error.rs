//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the Extended Dataset Profile
//! workspace. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.
//!
//! ## Design
//!
//! - Version errors carry the offending input verbatim so that stale
//!   producer/consumer mismatches can be diagnosed from the message alone.
//! - Field validation errors carry the exact user-facing message. These
//!   messages are part of the public contract and are asserted verbatim
//!   in tests.
//! - Nothing is downgraded to a warning. Every error is raised at the
//!   point of construction and no partially built value escapes.

use thiserror::Error;

/// Top-level error type for the EDP workspace.
#[derive(Error, Debug)]
pub enum EdpError {
    /// A version string could not be parsed.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// The supplied `schemaVersion` was rejected by the compatibility gate.
    #[error(transparent)]
    SchemaVersion(#[from] SchemaVersionError),

    /// A field-level rule was violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A document could not be deserialized into the schema type.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

/// Error parsing a semantic version.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The input does not follow the semantic versioning grammar.
    #[error("invalid version format '{input}': {reason}")]
    InvalidVersionFormat {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Error raised by the schema version compatibility gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaVersionError {
    /// The value is not a string or does not parse as a semantic version.
    #[error("Invalid schema version '{value}'")]
    InvalidSchemaVersion {
        /// The rejected value, rendered as it was supplied.
        value: String,
    },

    /// The major component differs from the schema's own major version.
    #[error("schemaVersion {supplied} does not match expected major version '{expected_major}'")]
    VersionMismatch {
        /// The supplied version string.
        supplied: String,
        /// Major version the schema type declares for itself.
        expected_major: u64,
    },
}

/// Field-level validation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A license carries neither a name nor a URL.
    #[error("License model needs at least 'name' or 'url'")]
    LicenseIncomplete,

    /// A text chunk ends at or before its start.
    #[error("End line index must be larger than start line index!")]
    EmptyChunk {
        /// Inclusive start line.
        start_line: i64,
        /// Exclusive end line.
        end_line: i64,
    },

    /// A string is not a `#/segment/...` JSON reference.
    #[error("The string \"{0}\" is not a JSON reference!")]
    InvalidJsonReference(String),

    /// A string is not an ISO 639-3 language code.
    #[error("\"{0}\" is not a ISO639-3 language string!")]
    InvalidLanguage(String),

    /// A number is outside its declared range.
    #[error("field '{field}' must be within [{minimum}, {maximum}], got {value}")]
    OutOfRange {
        /// Wire name of the field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        minimum: f64,
        /// Inclusive upper bound (`inf` when unbounded).
        maximum: f64,
    },

    /// A list that must not be empty when supplied was empty.
    #[error("field '{field}' must contain at least {min_length} item(s)")]
    TooShort {
        /// Wire name of the field.
        field: &'static str,
        /// Minimum number of items.
        min_length: usize,
    },

    /// A duration string is not ISO 8601.
    #[error("invalid ISO 8601 duration '{0}'")]
    InvalidDuration(String),

    /// A string is not one of the wire values of a closed enumeration.
    #[error("'{value}' is not a valid {type_name}")]
    UnknownVariant {
        /// Name of the enumeration.
        type_name: &'static str,
        /// The rejected input.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_mismatch_message_names_both_versions() {
        let err = SchemaVersionError::VersionMismatch {
            supplied: "1.0.0".to_string(),
            expected_major: 0,
        };
        assert_eq!(
            err.to_string(),
            "schemaVersion 1.0.0 does not match expected major version '0'"
        );
    }

    #[test]
    fn test_invalid_schema_version_message() {
        let err = SchemaVersionError::InvalidSchemaVersion {
            value: "banana".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid schema version 'banana'");
    }

    #[test]
    fn test_edp_error_is_transparent_for_validation() {
        let err: EdpError = ValidationError::LicenseIncomplete.into();
        assert_eq!(
            err.to_string(),
            "License model needs at least 'name' or 'url'"
        );
    }

    #[test]
    fn test_out_of_range_display() {
        let err = ValidationError::OutOfRange {
            field: "relativeOutlierCount",
            value: 1.5,
            minimum: 0.0,
            maximum: 1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("relativeOutlierCount"));
        assert!(msg.contains("1.5"));
    }
}
