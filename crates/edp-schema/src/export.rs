//! # JSON Schema Export
//!
//! Generates a Draft 2020-12 JSON Schema document from the descriptor
//! tree of a registered schema and writes it to disk.
//!
//! ## Document Layout
//!
//! - The root object is the schema record itself, with `$schema` and
//!   `title` set.
//! - Every other record and every enumeration becomes a `$defs` entry
//!   and is referenced as `{"$ref": "#/$defs/<Name>"}`.
//! - `T | null` and named unions become `anyOf`.
//! - Property keys are wire names. Required fields are listed in
//!   `required`; defaults, descriptions and numeric bounds are emitted
//!   on the property.
//! - `additionalProperties` is never restricted because unknown keys
//!   are ignored on input.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use edp_core::ValidationError;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::registry::SchemaEntry;
use crate::shape::{FieldShape, PrimitiveKind, RecordShape, TypeShape};

/// JSON Schema dialect of exported documents.
pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// File name used when the output path is a directory.
pub const DEFAULT_SCHEMA_FILE_NAME: &str = "edp_schema.json";

/// File name used for Markdown output when the output path is a directory.
pub const DEFAULT_MARKDOWN_FILE_NAME: &str = "edp_schema.md";

/// Error writing an exported schema.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The schema document could not be serialized.
    #[error("schema serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The output file could not be written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON Schema document.
    #[default]
    Json,
    /// Human-readable field reference.
    Markdown,
}

impl ExportFormat {
    /// Name of the format as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "markdown",
        }
    }

    /// File name used when the output path is a directory.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Json => DEFAULT_SCHEMA_FILE_NAME,
            Self::Markdown => DEFAULT_MARKDOWN_FILE_NAME,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(ValidationError::UnknownVariant {
                type_name: "ExportFormat",
                value: s.to_string(),
            }),
        }
    }
}

/// Generate the JSON Schema document of `entry`.
pub fn json_schema(entry: &SchemaEntry) -> Value {
    let root = entry.shape();
    let mut generator = Generator::default();

    let mut document = match &root {
        TypeShape::Record(record) => {
            generator.root = Some(record.name);
            generator.record_body(record)
        }
        other => generator.schema_for(other),
    };

    if let Value::Object(object) = &mut document {
        object.insert("$schema".to_string(), json!(JSON_SCHEMA_DIALECT));
        object.insert("title".to_string(), json!(entry.name));
        if !generator.defs.is_empty() {
            let defs: Map<String, Value> = generator.defs.into_iter().collect();
            object.insert("$defs".to_string(), Value::Object(defs));
        }
    }
    document
}

/// Resolve the file an export to `output` writes.
///
/// An existing directory gets [`DEFAULT_SCHEMA_FILE_NAME`] appended; any
/// other path is used verbatim.
pub fn resolve_output_path(output: &Path) -> PathBuf {
    resolve_output_path_for(output, ExportFormat::Json)
}

/// Like [`resolve_output_path`], with the default file name of `format`.
pub fn resolve_output_path_for(output: &Path, format: ExportFormat) -> PathBuf {
    if output.is_dir() {
        output.join(format.default_file_name())
    } else {
        output.to_path_buf()
    }
}

/// Write the JSON Schema of `entry` to `output` and return the file
/// written.
///
/// Existing files are overwritten.
pub fn export_schema(entry: &SchemaEntry, output: &Path) -> Result<PathBuf, ExportError> {
    export(entry, output, ExportFormat::Json)
}

/// Write `entry` in `format` to `output` and return the file written.
pub fn export(
    entry: &SchemaEntry,
    output: &Path,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let path = resolve_output_path_for(output, format);
    let contents = match format {
        ExportFormat::Json => {
            let mut bytes = serde_json::to_vec_pretty(&json_schema(entry))?;
            bytes.push(b'\n');
            bytes
        }
        ExportFormat::Markdown => crate::markdown::document_schema(entry).into_bytes(),
    };
    std::fs::write(&path, contents)?;
    tracing::info!(
        schema = entry.name,
        version = %entry.version,
        %format,
        path = %path.display(),
        "exported schema"
    );
    Ok(path)
}

#[derive(Default)]
struct Generator {
    root: Option<&'static str>,
    defs: BTreeMap<String, Value>,
}

impl Generator {
    fn schema_for(&mut self, shape: &TypeShape) -> Value {
        match shape {
            TypeShape::Primitive(kind) => primitive_schema(*kind),
            TypeShape::Literal(values) => match values.as_slice() {
                [single] => json!({ "const": single }),
                _ => json!({ "enum": values }),
            },
            TypeShape::Enum(e) => {
                if !self.defs.contains_key(e.name) {
                    let mut def = json!({
                        "title": e.name,
                        "type": "string",
                        "enum": e.values,
                    });
                    if !e.description.is_empty() {
                        def["description"] = json!(e.description);
                    }
                    self.defs.insert(e.name.to_string(), def);
                }
                def_ref(e.name)
            }
            TypeShape::Record(record) => {
                if self.root == Some(record.name) {
                    return json!({ "$ref": "#" });
                }
                if !self.defs.contains_key(record.name) {
                    // Reserve the slot before walking fields so that cycles
                    // resolve to a reference.
                    self.defs.insert(record.name.to_string(), Value::Null);
                    let body = self.record_body(record);
                    self.defs.insert(record.name.to_string(), body);
                }
                def_ref(record.name)
            }
            TypeShape::Sequence(inner) => json!({
                "type": "array",
                "items": self.schema_for(inner),
            }),
            TypeShape::Set(inner) => json!({
                "type": "array",
                "items": self.schema_for(inner),
                "uniqueItems": true,
            }),
            TypeShape::Tuple(items) => {
                let prefix: Vec<Value> = items.iter().map(|item| self.schema_for(item)).collect();
                json!({
                    "type": "array",
                    "prefixItems": prefix,
                    "items": false,
                    "minItems": items.len(),
                    "maxItems": items.len(),
                })
            }
            TypeShape::Map { value, .. } => json!({
                "type": "object",
                "additionalProperties": self.schema_for(value),
            }),
            TypeShape::Union(union) => {
                let members: Vec<Value> =
                    union.members.iter().map(|m| self.schema_for(m)).collect();
                json!({ "anyOf": members })
            }
            TypeShape::Opaque(_) => json!({}),
        }
    }

    fn record_body(&mut self, record: &RecordShape) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in record.fields() {
            if field.required {
                required.push(Value::String(field.name.to_string()));
            }
            let property = self.property(&field);
            properties.insert(field.name.to_string(), property);
        }

        let mut body = json!({
            "title": record.name,
            "type": "object",
            "properties": properties,
        });
        if !record.description.is_empty() {
            body["description"] = json!(record.description);
        }
        if !required.is_empty() {
            body["required"] = Value::Array(required);
        }
        body
    }

    fn property(&mut self, field: &FieldShape) -> Value {
        let mut property = match &field.shape {
            Some(shape) => self.schema_for(shape),
            None => json!({}),
        };
        let Value::Object(object) = &mut property else {
            return property;
        };
        if !field.description.is_empty() {
            object.insert("description".to_string(), json!(field.description));
        }
        if let Some(default) = &field.default {
            object.insert("default".to_string(), default.clone());
        }
        if let Some(minimum) = field.minimum {
            object.insert("minimum".to_string(), json!(minimum));
        }
        if let Some(maximum) = field.maximum.filter(|m| m.is_finite()) {
            object.insert("maximum".to_string(), json!(maximum));
        }
        if let Some(min_items) = field.min_items {
            object.insert("minItems".to_string(), json!(min_items));
        }
        if let Some(pattern) = field.pattern {
            object.insert("pattern".to_string(), json!(pattern));
        }
        property
    }
}

fn def_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/$defs/{name}") })
}

fn primitive_schema(kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Null => json!({ "type": "null" }),
        PrimitiveKind::String => json!({ "type": "string" }),
        PrimitiveKind::Integer => json!({ "type": "integer" }),
        PrimitiveKind::Float => json!({ "type": "number" }),
        PrimitiveKind::Complex => json!({ "type": "string", "format": "complex" }),
        PrimitiveKind::Boolean => json!({ "type": "boolean" }),
        PrimitiveKind::DateTime => json!({ "type": "string", "format": "date-time" }),
        PrimitiveKind::Duration => json!({ "type": "string", "format": "duration" }),
        PrimitiveKind::Path => json!({ "type": "string", "format": "path" }),
        PrimitiveKind::Url => json!({ "type": "string", "format": "uri", "minLength": 1 }),
        PrimitiveKind::Uuid => json!({ "type": "string", "format": "uuid" }),
        PrimitiveKind::Version => json!({ "type": "string" }),
        PrimitiveKind::Language => json!({
            "type": "string",
            "minLength": 3,
            "maxLength": 3,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::current_schema;

    #[test]
    fn test_root_is_the_profile_record() {
        let schema = json_schema(&current_schema());
        assert_eq!(schema["$schema"], json!(JSON_SCHEMA_DIALECT));
        assert_eq!(schema["title"], json!("ExtendedDatasetProfile"));
        assert_eq!(schema["type"], json!("object"));
        assert!(schema["$defs"].get("ExtendedDatasetProfile").is_none());

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            required,
            ["name", "generatedBy", "freely_available", "volume", "assetSha256Hash"]
        );
    }

    #[test]
    fn test_wire_names_are_property_keys() {
        let schema = json_schema(&current_schema());
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("schemaVersion"));
        assert!(properties.contains_key("freely_available"));
        assert!(!properties.contains_key("schema_version"));

        let reference = &schema["$defs"]["JsonReference"];
        assert!(reference["properties"].get("$ref").is_some());
        assert_eq!(reference["required"], json!(["$ref"]));
    }

    #[test]
    fn test_records_and_enums_are_referenced() {
        let schema = json_schema(&current_schema());
        assert_eq!(
            schema["properties"]["structuredDatasets"]["items"],
            json!({ "$ref": "#/$defs/StructuredDataSet" })
        );
        assert_eq!(
            schema["$defs"]["Trend"]["enum"],
            json!(["No Trend", "Increasing", "Decreasing"])
        );
    }

    #[test]
    fn test_optional_fields_use_any_of_with_null() {
        let schema = json_schema(&current_schema());
        let category = &schema["properties"]["dataCategory"];
        assert_eq!(category["anyOf"], json!([{ "type": "string" }, { "type": "null" }]));
        assert_eq!(category["default"], Value::Null);
    }

    #[test]
    fn test_bounds_and_min_items() {
        let schema = json_schema(&current_schema());
        let outliers = &schema["$defs"]["NumericColumn"]["properties"]["relativeOutlierCount"];
        assert_eq!(outliers["minimum"], json!(0.0));
        assert_eq!(outliers["maximum"], json!(1.0));

        let noise = &schema["$defs"]["ImageDataSet"]["properties"]["noise"];
        assert_eq!(noise["minimum"], json!(0.0));
        assert!(noise.get("maximum").is_none());

        assert_eq!(schema["properties"]["assetRefs"]["minItems"], json!(1));
    }

    #[test]
    fn test_numeric_union_is_inlined() {
        let schema = json_schema(&current_schema());
        let min = &schema["$defs"]["NumericColumn"]["properties"]["min"];
        assert_eq!(
            min["anyOf"],
            json!([
                { "type": "integer" },
                { "type": "number" },
                { "type": "string", "format": "duration" }
            ])
        );
    }

    #[test]
    fn test_resolve_output_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_output_path(dir.path()), dir.path().join(DEFAULT_SCHEMA_FILE_NAME));

        let file = dir.path().join("custom.json");
        assert_eq!(resolve_output_path(&file), file);
        assert_eq!(
            resolve_output_path_for(dir.path(), ExportFormat::Markdown),
            dir.path().join(DEFAULT_MARKDOWN_FILE_NAME)
        );
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("yaml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::default(), ExportFormat::Json);
    }
}
