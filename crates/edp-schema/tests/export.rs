//! Integration tests: the exported JSON Schema accepts what the catalog
//! produces and rejects what the catalog rejects.

use edp_schema::models::v0::ExtendedDatasetProfile;
use edp_schema::{
    current_schema, export, export_schema, field_path, json_schema, DocumentValidationError,
    DocumentValidator, ExportFormat, DEFAULT_MARKDOWN_FILE_NAME, DEFAULT_SCHEMA_FILE_NAME,
};
use serde_json::{json, Value};

const FULL_PROFILE: &str = include_str!("fixtures/full_profile.json");

#[test]
fn test_fixture_document_is_valid() {
    let document: Value = serde_json::from_str(FULL_PROFILE).unwrap();
    DocumentValidator::current()
        .unwrap()
        .validate_document(&document)
        .unwrap();
}

#[test]
fn test_serialized_profiles_are_valid() {
    let validator = DocumentValidator::current().unwrap();

    let full = ExtendedDatasetProfile::from_json_str(FULL_PROFILE).unwrap();
    validator
        .validate_document(&serde_json::to_value(&full).unwrap())
        .unwrap();

    let minimal = ExtendedDatasetProfile::new("n", "edp-test 1.0", true, 0, "h");
    validator
        .validate_document(&serde_json::to_value(&minimal).unwrap())
        .unwrap();
}

#[test]
fn test_catalog_rejections_are_schema_violations() {
    let validator = DocumentValidator::current().unwrap();
    for (pointer, value) in [
        ("/imageDatasets/0/brightness", json!(300.0)),
        ("/datasetTree/1/parent", json!({"$ref": "datasetTree/0"})),
        ("/assetRefs", json!([])),
        ("/videoDatasets/0/pixelFormat", json!("yuv999")),
    ] {
        let mut document: Value = serde_json::from_str(FULL_PROFILE).unwrap();
        *document.pointer_mut(pointer).unwrap() = value;

        assert!(ExtendedDatasetProfile::from_value(document.clone()).is_err(), "{pointer}");
        let field = field_path(pointer);
        match validator.validate_document(&document) {
            Err(DocumentValidationError::Rejected { violations, .. }) => {
                assert!(violations.within(&field).count() > 0, "{field}: {violations}");
            }
            other => panic!("{field}: expected Rejected, got {other:?}"),
        }
    }
}

#[test]
fn test_export_to_file_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    let entry = current_schema();

    let written = export_schema(&entry, dir.path()).unwrap();
    assert_eq!(written, dir.path().join(DEFAULT_SCHEMA_FILE_NAME));
    let text = std::fs::read_to_string(&written).unwrap();
    assert!(text.ends_with("}\n"));
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, json_schema(&entry));

    let custom = dir.path().join("profile.schema.json");
    std::fs::write(&custom, "stale").unwrap();
    assert_eq!(export_schema(&entry, &custom).unwrap(), custom);
    let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&custom).unwrap()).unwrap();
    assert_eq!(parsed["title"], json!("ExtendedDatasetProfile"));
}

#[test]
fn test_export_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let written = export(&current_schema(), dir.path(), ExportFormat::Markdown).unwrap();
    assert_eq!(written, dir.path().join(DEFAULT_MARKDOWN_FILE_NAME));
    let text = std::fs::read_to_string(written).unwrap();
    assert!(text.starts_with("# ExtendedDatasetProfile\n"));
}

#[test]
fn test_export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("missing").join("schema.json");
    assert!(export_schema(&current_schema(), &target).is_err());
}
