//! # Document Validation
//!
//! Checks a JSON profile against the exported JSON Schema of a registered
//! catalog revision (Draft 2020-12) and reports every rejected field by
//! its catalog path, e.g. `imageDatasets[0].brightness`.
//!
//! Deserializing a profile stops at the first problem and also enforces
//! cross-field rules. Document validation lists all structural problems
//! at once.

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use crate::export::json_schema;
use crate::registry::{current_schema, SchemaEntry};

/// Error during document validation.
#[derive(Error, Debug)]
pub enum DocumentValidationError {
    /// The profile does not conform to the catalog revision.
    #[error("profile rejected by {schema_name}: {} field violation(s)\n{violations}", .violations.len())]
    Rejected {
        /// Root record name of the revision validated against.
        schema_name: String,
        /// Every rejected field.
        violations: SchemaViolations,
    },

    /// The exported schema could not be compiled.
    #[error("cannot compile JSON Schema for {schema_name}: {reason}")]
    SchemaCompile {
        /// Root record name of the revision.
        schema_name: String,
        /// Compiler diagnostic.
        reason: String,
    },
}

/// A field the exported schema rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Catalog path of the offending value; empty for the profile itself.
    pub field: String,
    /// The JSON Schema keyword that failed, such as `maximum` or `required`.
    pub keyword: String,
    /// Validator message.
    pub message: String,
}

impl FieldViolation {
    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        let schema_path = error.schema_path.to_string();
        Self {
            field: field_path(&error.instance_path.to_string()),
            keyword: schema_path.rsplit('/').next().unwrap_or_default().to_string(),
            message: error.to_string(),
        }
    }

    /// Whether this violation is at `field` or nested below it.
    pub fn is_within(&self, field: &str) -> bool {
        match self.field.strip_prefix(field) {
            Some(rest) => field.is_empty() || rest.is_empty() || rest.starts_with(['.', '[']),
            None => false,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = if self.field.is_empty() { "<profile>" } else { &self.field };
        write!(f, "{field} [{}]: {}", self.keyword, self.message)
    }
}

/// Every field violation of one profile, in validator order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaViolations(Vec<FieldViolation>);

impl SchemaViolations {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldViolation> {
        self.0.iter()
    }

    /// Violations at `field` or nested below it.
    pub fn within<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldViolation> + 'a {
        self.0.iter().filter(move |v| v.is_within(field))
    }

    /// Distinct catalog paths that were rejected, sorted.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.0.iter().map(|v| v.field.as_str()).collect();
        fields.sort_unstable();
        fields.dedup();
        fields
    }
}

impl<'a> IntoIterator for &'a SchemaViolations {
    type Item = &'a FieldViolation;
    type IntoIter = std::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.0 {
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            write!(f, "- {violation}")?;
        }
        Ok(())
    }
}

/// Render a JSON Pointer as a catalog path: `/assetRefs/0/license` becomes
/// `assetRefs[0].license`.
pub fn field_path(pointer: &str) -> String {
    let mut path = String::new();
    for token in pointer.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            path.push('[');
            path.push_str(&token);
            path.push(']');
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&token);
        }
    }
    path
}

/// A compiled validator for one registered catalog revision.
///
/// Compilation happens once at construction. The validator is
/// `Send + Sync` and can be shared across threads.
pub struct DocumentValidator {
    entry: SchemaEntry,
    schema: Value,
    validator: Validator,
}

impl fmt::Debug for DocumentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentValidator")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

impl DocumentValidator {
    /// Compile the exported schema of `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentValidationError::SchemaCompile`] if the generated
    /// schema is not a valid Draft 2020-12 schema.
    pub fn new(entry: SchemaEntry) -> Result<Self, DocumentValidationError> {
        let schema = json_schema(&entry);
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts
            .build(&schema)
            .map_err(|e| DocumentValidationError::SchemaCompile {
                schema_name: entry.name.to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!(
            schema = entry.name,
            version = %entry.version,
            "compiled document validator"
        );
        Ok(Self {
            entry,
            schema,
            validator,
        })
    }

    /// Compile the current catalog revision.
    pub fn current() -> Result<Self, DocumentValidationError> {
        Self::new(current_schema())
    }

    pub fn entry(&self) -> &SchemaEntry {
        &self.entry
    }

    /// The compiled JSON Schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Collect every field violation of `profile` without failing.
    pub fn violations(&self, profile: &Value) -> SchemaViolations {
        SchemaViolations(
            self.validator
                .iter_errors(profile)
                .map(|e| FieldViolation::from_error(&e))
                .collect(),
        )
    }

    /// Validate a parsed profile.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentValidationError::Rejected`] listing every field
    /// violation.
    pub fn validate_document(&self, profile: &Value) -> Result<(), DocumentValidationError> {
        let violations = self.violations(profile);
        if violations.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            schema = self.entry.name,
            count = violations.len(),
            "profile rejected by exported schema"
        );
        Err(DocumentValidationError::Rejected {
            schema_name: self.entry.name.to_string(),
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "name": "weather-stations",
            "generatedBy": "edp-test 1.0",
            "freely_available": false,
            "volume": 4096,
            "assetSha256Hash": "00ff"
        })
    }

    fn rejected(doc: &Value) -> SchemaViolations {
        match DocumentValidator::current().unwrap().validate_document(doc) {
            Err(DocumentValidationError::Rejected { violations, .. }) => violations,
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_document_is_valid() {
        let validator = DocumentValidator::current().unwrap();
        validator.validate_document(&minimal()).unwrap();
        assert!(validator.violations(&minimal()).is_empty());
    }

    #[test]
    fn test_missing_required_field_is_reported_on_profile() {
        let mut doc = minimal();
        doc.as_object_mut().unwrap().remove("volume");
        let violations = rejected(&doc);
        let missing = violations.iter().find(|v| v.keyword == "required").unwrap();
        assert_eq!(missing.field, "");
        assert!(missing.message.contains("volume"), "{missing}");
        assert!(missing.to_string().starts_with("<profile> [required]:"), "{missing}");
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut doc = minimal();
        doc["volume"] = json!("large");
        doc["tags"] = json!("not-a-list");
        doc["assetRefs"] = json!([]);
        let fields = rejected(&doc).fields().join(",");
        for field in ["volume", "tags", "assetRefs"] {
            assert!(fields.split(',').any(|f| f == field), "{fields}");
        }
    }

    #[test]
    fn test_nested_violation_uses_catalog_path() {
        let mut doc = minimal();
        doc["dataTypes"] = json!(["structured", "spreadsheet"]);
        let violations = rejected(&doc);
        assert!(violations.within("dataTypes").count() > 0);
        assert!(violations.within("dataTypes[1]").count() > 0);
        assert_eq!(violations.within("dataTypes[0]").count(), 0);
        assert!(violations.to_string().contains("- dataTypes[1] ["), "{violations}");
    }

    #[test]
    fn test_field_path() {
        assert_eq!(field_path(""), "");
        assert_eq!(field_path("/volume"), "volume");
        assert_eq!(field_path("/imageDatasets/0/brightness"), "imageDatasets[0].brightness");
        assert_eq!(field_path("/datasetTree/1/parent/$ref"), "datasetTree[1].parent.$ref");
        assert_eq!(field_path("/a~1b/c~0d"), "a/b.c~d");
    }

    #[test]
    fn test_within_respects_segment_boundaries() {
        let violation = FieldViolation {
            field: "assetRefs[0].license".into(),
            keyword: "anyOf".into(),
            message: String::new(),
        };
        assert!(violation.is_within(""));
        assert!(violation.is_within("assetRefs"));
        assert!(violation.is_within("assetRefs[0]"));
        assert!(violation.is_within("assetRefs[0].license"));
        assert!(!violation.is_within("asset"));
        assert!(!violation.is_within("assetRefs[0].lic"));
    }
}
