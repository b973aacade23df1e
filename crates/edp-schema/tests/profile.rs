//! Integration tests: the v0 catalog against realistic documents.
//!
//! The fixture under `tests/fixtures/full_profile.json` sets every field of
//! every record at least once. The descriptor cross-check walks the
//! serialized profile alongside its [`TypeShape`] and fails on any key the
//! descriptor does not declare, so the two cannot drift apart.

use edp_core::{EdpError, SchemaVersionError, ValidationError, Version};
use edp_schema::models::v0::{
    AssetProcessingStatus, DataSetType, ExtendedDatasetProfile, JsonReference, License, Numeric,
};
use edp_schema::{Describe, TypeShape};
use serde_json::{json, Value};

const FULL_PROFILE: &str = include_str!("fixtures/full_profile.json");

fn full_profile() -> ExtendedDatasetProfile {
    ExtendedDatasetProfile::from_json_str(FULL_PROFILE).unwrap()
}

fn minimal() -> Value {
    json!({
        "name": "dataset-dummy-name",
        "generatedBy": "edp-test 1.0",
        "freely_available": true,
        "volume": 1024,
        "assetSha256Hash": "ab12"
    })
}

/// Check `value` against `shape`, collecting every mismatch.
fn conform(shape: &TypeShape, value: &Value, path: &str, problems: &mut Vec<String>) {
    match shape {
        TypeShape::Record(record) => {
            let Some(object) = value.as_object() else {
                problems.push(format!("{path}: expected object for {}", record.name));
                return;
            };
            let fields = record.fields();
            for key in object.keys() {
                if !fields.iter().any(|f| f.name == key.as_str()) {
                    problems.push(format!("{path}: undeclared key '{key}' in {}", record.name));
                }
            }
            for field in &fields {
                match object.get(field.name) {
                    Some(child) => {
                        if let Some(child_shape) = &field.shape {
                            let child_path = format!("{path}.{}", field.name);
                            conform(child_shape, child, &child_path, problems);
                        }
                    }
                    None if field.required => {
                        problems.push(format!("{path}: required key '{}' missing", field.name));
                    }
                    None => {}
                }
            }
        }
        TypeShape::Sequence(inner) | TypeShape::Set(inner) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    conform(inner, item, &format!("{path}[{i}]"), problems);
                }
            }
            None => problems.push(format!("{path}: expected array")),
        },
        TypeShape::Union(union) => {
            if let Some(inner) = union.optional_inner() {
                if !value.is_null() {
                    conform(inner, value, path, problems);
                }
            }
        }
        TypeShape::Enum(e) => {
            if !value.as_str().is_some_and(|s| e.values.iter().any(|v| *v == s)) {
                problems.push(format!("{path}: {value} is not a {}", e.name));
            }
        }
        _ => {}
    }
}

#[test]
fn test_full_profile_parses() {
    let edp = full_profile();
    assert_eq!(edp.schema_version(), &Version::new(0, 1, 0));
    assert_eq!(edp.asset_processing_status, Some(AssetProcessingStatus::RefinedData));
    assert_eq!(edp.data_types.len(), DataSetType::ALL.len());
    assert_eq!(edp.asset_refs.len(), 1);
    assert_eq!(edp.asset_refs[0].license.name(), Some("CC-BY-4.0"));

    let table = &edp.structured_datasets[0];
    let vehicles = &table.numeric_columns[0];
    assert_eq!(vehicles.min, Numeric::Integer(0));
    assert_eq!(vehicles.mean, Numeric::Float(211.5));
    assert_eq!(
        table.columns_by_name().keys().copied().collect::<Vec<_>>(),
        ["station", "timestamp", "vehicles"]
    );

    let tree = &edp.dataset_tree;
    assert_eq!(tree[1].parent.as_ref().map(JsonReference::as_str), Some("#/datasetTree/0"));
    assert!(tree[2].file_properties.is_none());
}

#[test]
fn test_full_profile_round_trips() {
    let edp = full_profile();
    let json = edp.to_json_string_pretty().unwrap();
    assert_eq!(ExtendedDatasetProfile::from_json_str(&json).unwrap(), edp);
}

#[test]
fn test_serialized_profile_matches_descriptor() {
    let value = serde_json::to_value(full_profile()).unwrap();
    let mut problems = Vec::new();
    conform(&ExtendedDatasetProfile::shape(), &value, "ExtendedDatasetProfile", &mut problems);
    assert!(problems.is_empty(), "descriptor drift:\n{}", problems.join("\n"));
}

#[test]
fn test_minimal_profile_serializes_within_descriptor() {
    let edp = ExtendedDatasetProfile::from_value(minimal()).unwrap();
    let value = serde_json::to_value(edp).unwrap();
    let mut problems = Vec::new();
    conform(&ExtendedDatasetProfile::shape(), &value, "ExtendedDatasetProfile", &mut problems);
    assert!(problems.is_empty(), "{}", problems.join("\n"));
}

#[test]
fn test_identity_fields_outside_catalog_are_ignored() {
    let mut doc = minimal();
    doc["assetId"] = json!("urn:asset:42");
    doc["_id"] = json!({"oid": "65a1"});
    let edp = ExtendedDatasetProfile::from_value(doc).unwrap();
    let back = serde_json::to_value(&edp).unwrap();
    assert!(back.get("assetId").is_none());
}

#[test]
fn test_incompatible_major_version_is_rejected() {
    let mut doc = minimal();
    doc["schemaVersion"] = json!("1.0.0");
    let err = ExtendedDatasetProfile::from_value(doc).unwrap_err();
    assert!(
        err.to_string()
            .contains("schemaVersion 1.0.0 does not match expected major version '0'"),
        "{err}"
    );
    assert!(
        matches!(
            &err,
            EdpError::SchemaVersion(SchemaVersionError::VersionMismatch {
                supplied,
                expected_major: 0,
            }) if supplied == "1.0.0"
        ),
        "{err:?}"
    );
}

#[test]
fn test_non_string_schema_version_is_rejected() {
    let mut doc = minimal();
    doc["schemaVersion"] = json!(2);
    let err = ExtendedDatasetProfile::from_value(doc).unwrap_err();
    assert!(err.to_string().contains("Invalid schema version '2'"), "{err}");
    assert!(matches!(
        err,
        EdpError::SchemaVersion(SchemaVersionError::InvalidSchemaVersion { .. })
    ));
}

#[test]
fn test_schema_version_defaults_to_package_version() {
    let edp = ExtendedDatasetProfile::from_value(minimal()).unwrap();
    assert_eq!(edp.schema_version(), &Version::current());
    assert!(matches!(
        edp.with_schema_version("v0.1"),
        Err(SchemaVersionError::InvalidSchemaVersion { .. })
    ));
}

#[test]
fn test_license_needs_name_or_url() {
    let mut doc: Value = serde_json::from_str(FULL_PROFILE).unwrap();
    doc["assetRefs"][0]["license"] = json!({});
    let err = ExtendedDatasetProfile::from_value(doc).unwrap_err();
    assert!(
        err.to_string().contains("License model needs at least 'name' or 'url'"),
        "{err}"
    );

    assert!(matches!(License::new(None, None), Err(ValidationError::LicenseIncomplete)));
    let url_only = License::at_url("https://opensource.org/license/mit");
    assert_eq!(url_only.name(), None);
}

#[test]
fn test_json_references_are_validated() {
    let mut doc: Value = serde_json::from_str(FULL_PROFILE).unwrap();
    doc["datasetTree"][1]["parent"] = json!({"$ref": "datasetTree/0"});
    let err = ExtendedDatasetProfile::from_value(doc).unwrap_err();
    assert!(err.to_string().contains("datasetTree/0"), "{err}");

    let reference = JsonReference::new("#/structuredDatasets/0").unwrap();
    let document: Value = serde_json::from_str(FULL_PROFILE).unwrap();
    let target = reference.resolve(&document).unwrap();
    assert_eq!(target["rowCount"], json!(1440));
}

#[test]
fn test_bounded_fields_reject_out_of_range_values() {
    for (pointer, value) in [
        ("/imageDatasets/0/brightness", json!(300.0)),
        ("/imageDatasets/0/resolution/width", json!(-1)),
        ("/structuredDatasets/0/numericColumns/0/relativeOutlierCount", json!(-0.5)),
    ] {
        let mut doc: Value = serde_json::from_str(FULL_PROFILE).unwrap();
        *doc.pointer_mut(pointer).unwrap() = value;
        assert!(
            ExtendedDatasetProfile::from_value(doc).is_err(),
            "{pointer} should be out of range"
        );
    }
}
