//! The root record of the v0 catalog.

use std::collections::BTreeSet;

use edp_core::{EdpError, SchemaVersionError, ValidationError, Version, CURRENT_VERSION};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::archive::{ArchiveDataSet, DatasetTreeNode};
use super::asset::AssetReference;
use super::enums::{
    AssetGrowthRate, AssetImmutability, AssetProcessingStatus, AssetTransferType,
    AssetUpdatePeriod, DataSetType,
};
use super::media::{AudioDataSet, DocumentDataSet, ImageDataSet, VideoDataSet};
use super::tabular::{SemiStructuredDataSet, StructuredDataSet, TemporalCover};
use super::text::UnstructuredTextDataSet;
use crate::compat::{deserialize_schema_version, VersionedSchema};
use crate::shape::{field, list_field, nullable_field, Describe, FieldShape, TypeShape};

/// The semantic information of a data asset.
///
/// Deserialization runs every field rule, including the `schemaVersion`
/// compatibility gate. Unknown top-level keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedDatasetProfile {
    #[serde(
        default = "Version::current",
        deserialize_with = "deserialize_profile_version"
    )]
    schema_version: Version,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "non_empty_asset_refs",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub asset_refs: Vec<AssetReference>,
    #[serde(default)]
    pub data_category: Option<String>,
    #[serde(default = "default_processing_status")]
    pub asset_processing_status: Option<AssetProcessingStatus>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub data_sub_category: Option<String>,
    #[serde(default)]
    pub asset_type_info: Option<String>,
    pub generated_by: String,
    #[serde(default)]
    pub transfer_type_flag: Option<AssetTransferType>,
    #[serde(default)]
    pub transfer_type_frequency: Option<AssetUpdatePeriod>,
    #[serde(default)]
    pub growth_flag: Option<AssetGrowthRate>,
    #[serde(default)]
    pub immutability_flag: Option<AssetImmutability>,
    #[serde(default)]
    pub allowed_for_ai_training: Option<bool>,
    #[serde(default)]
    pub nda: Option<String>,
    #[serde(default)]
    pub dpa: Option<String>,
    #[serde(default)]
    pub data_log: Option<String>,
    #[serde(rename = "freely_available")]
    pub freely_available: bool,
    /// Volume of the asset in bytes.
    pub volume: i64,
    #[serde(default)]
    pub data_types: BTreeSet<DataSetType>,
    #[serde(default)]
    pub temporal_cover: Option<TemporalCover>,
    #[serde(default)]
    pub periodicity: Option<String>,
    pub asset_sha256_hash: String,
    #[serde(default)]
    pub archive_datasets: Vec<ArchiveDataSet>,
    #[serde(default)]
    pub structured_datasets: Vec<StructuredDataSet>,
    #[serde(default)]
    pub semi_structured_datasets: Vec<SemiStructuredDataSet>,
    #[serde(default)]
    pub unstructured_text_datasets: Vec<UnstructuredTextDataSet>,
    #[serde(default)]
    pub image_datasets: Vec<ImageDataSet>,
    #[serde(default)]
    pub video_datasets: Vec<VideoDataSet>,
    #[serde(default)]
    pub audio_datasets: Vec<AudioDataSet>,
    #[serde(default)]
    pub document_datasets: Vec<DocumentDataSet>,
    #[serde(default)]
    pub dataset_tree: Vec<DatasetTreeNode>,
}

const SCHEMA_VERSION_FIELD: &str = "schemaVersion";

fn deserialize_profile_version<'de, D>(deserializer: D) -> Result<Version, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_schema_version::<ExtendedDatasetProfile, D>(deserializer)
}

fn default_processing_status() -> Option<AssetProcessingStatus> {
    Some(AssetProcessingStatus::default())
}

fn non_empty_asset_refs<'de, D>(deserializer: D) -> Result<Vec<AssetReference>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Vec::<AssetReference>::deserialize(deserializer)?;
    check_asset_refs(&refs).map_err(serde::de::Error::custom)?;
    Ok(refs)
}

fn check_asset_refs(refs: &[AssetReference]) -> Result<(), ValidationError> {
    if refs.is_empty() {
        return Err(ValidationError::TooShort {
            field: "assetRefs",
            min_length: 1,
        });
    }
    Ok(())
}

impl ExtendedDatasetProfile {
    /// A profile with the required fields set and every other field at
    /// its catalog default.
    pub fn new(
        name: impl Into<String>,
        generated_by: impl Into<String>,
        freely_available: bool,
        volume: i64,
        asset_sha256_hash: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: Self::expected_version(),
            name: name.into(),
            asset_refs: Vec::new(),
            data_category: None,
            asset_processing_status: default_processing_status(),
            description: None,
            tags: Vec::new(),
            data_sub_category: None,
            asset_type_info: None,
            generated_by: generated_by.into(),
            transfer_type_flag: None,
            transfer_type_frequency: None,
            growth_flag: None,
            immutability_flag: None,
            allowed_for_ai_training: None,
            nda: None,
            dpa: None,
            data_log: None,
            freely_available,
            volume,
            data_types: BTreeSet::new(),
            temporal_cover: None,
            periodicity: None,
            asset_sha256_hash: asset_sha256_hash.into(),
            archive_datasets: Vec::new(),
            structured_datasets: Vec::new(),
            semi_structured_datasets: Vec::new(),
            unstructured_text_datasets: Vec::new(),
            image_datasets: Vec::new(),
            video_datasets: Vec::new(),
            audio_datasets: Vec::new(),
            document_datasets: Vec::new(),
            dataset_tree: Vec::new(),
        }
    }

    /// The version of the schema this profile was written against.
    pub fn schema_version(&self) -> &Version {
        &self.schema_version
    }

    /// Replace the schema version.
    ///
    /// # Errors
    ///
    /// Fails like the `schemaVersion` field does on input: the string must
    /// be a semantic version with this schema's major version.
    pub fn with_schema_version(mut self, supplied: &str) -> Result<Self, SchemaVersionError> {
        self.schema_version = Self::check_schema_version(supplied)?;
        Ok(self)
    }

    /// Replace the asset references.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooShort`] if `refs` is empty.
    pub fn with_asset_refs(mut self, refs: Vec<AssetReference>) -> Result<Self, ValidationError> {
        check_asset_refs(&refs)?;
        self.asset_refs = refs;
        Ok(self)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// See [`Self::from_value`].
    pub fn from_json_str(json: &str) -> Result<Self, EdpError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// - [`EdpError::SchemaVersion`] if `schemaVersion` is present and
    ///   rejected by the compatibility gate.
    /// - [`EdpError::Deserialization`] for every other field rule.
    pub fn from_value(value: Value) -> Result<Self, EdpError> {
        if let Some(supplied) = value.get(SCHEMA_VERSION_FIELD) {
            Self::check_schema_version_value(supplied)?;
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to a JSON string using wire names.
    pub fn to_json_string(&self) -> Result<String, EdpError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String, EdpError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl VersionedSchema for ExtendedDatasetProfile {
    const NAME: &'static str = "ExtendedDatasetProfile";
}

impl Describe for ExtendedDatasetProfile {
    fn shape() -> TypeShape {
        TypeShape::Record(crate::shape::RecordShape::new(
            "ExtendedDatasetProfile",
            "The extended dataset profile which represents the semantic information of a data asset.",
            profile_fields,
        ))
    }
}

fn profile_fields() -> Vec<FieldShape> {
    vec![
        FieldShape::defaulted(
            SCHEMA_VERSION_FIELD,
            Version::shape(),
            Value::String(CURRENT_VERSION.to_string()),
            "Version of the JSON Schema used to generate this EDP",
        ),
        field::<String>("name", "Name of the asset"),
        list_field::<Vec<AssetReference>>(
            "assetRefs",
            "References to multiple dataspace locations for the asset",
        )
        .with_min_items(1),
        nullable_field::<Option<String>>(
            "dataCategory",
            "A data room-specific categorization of the asset (e.g. https://github.com/Mobility-Data-Space/mobility-data-space/wiki/MDS-Ontology",
        ),
        FieldShape::defaulted(
            "assetProcessingStatus",
            Option::<AssetProcessingStatus>::shape(),
            Value::String(AssetProcessingStatus::OriginalData.as_str().to_string()),
            "Processing status of the asset",
        ),
        nullable_field::<Option<String>>("description", "Description of the asset"),
        list_field::<Vec<String>>("tags", "Optional list of tags"),
        nullable_field::<Option<String>>(
            "dataSubCategory",
            "A data room-specific sub-categorization for assetDataCategory",
        ),
        nullable_field::<Option<String>>(
            "assetTypeInfo",
            "Additional type-specific information for the asset",
        ),
        field::<String>(
            "generatedBy",
            "Name and version of the toolchain that generated this extended dataset profile",
        ),
        nullable_field::<Option<AssetTransferType>>(
            "transferTypeFlag",
            "Describes whether an asset grows steadily over time.",
        ),
        nullable_field::<Option<AssetUpdatePeriod>>(
            "transferTypeFrequency",
            "Describes how often a data set is updated.",
        ),
        nullable_field::<Option<AssetGrowthRate>>(
            "growthFlag",
            "Growth rate of the dataset per day",
        ),
        nullable_field::<Option<AssetImmutability>>("immutabilityFlag", "Is the dataset immutable"),
        nullable_field::<Option<bool>>(
            "allowedForAiTraining",
            "Whether this dataset is allowed to be used for AI training.",
        ),
        nullable_field::<Option<String>>(
            "nda",
            "Identifier that describes or links to the non disclosure agreement",
        ),
        nullable_field::<Option<String>>("dpa", "Identifier that describes or links a dpa"),
        nullable_field::<Option<String>>("dataLog", "Description or links to data log"),
        field::<bool>(
            "freely_available",
            "Whether asset is freely available. That means, there is no registration or login needed to download it.",
        ),
        field::<i64>("volume", "Volume of the asset in bytes"),
        list_field::<BTreeSet<DataSetType>>("dataTypes", "Types of data contained in this asset"),
        nullable_field::<Option<TemporalCover>>(
            "temporalCover",
            "Earliest and latest dates contained in this asset",
        ),
        nullable_field::<Option<String>>(
            "periodicity",
            "The periodicity of the index date time field of the first structured dataset",
        ),
        field::<String>("assetSha256Hash", "Cryptographic sha-256 hash of the asset"),
        list_field::<Vec<ArchiveDataSet>>("archiveDatasets", "Metadata for all archives detected"),
        list_field::<Vec<StructuredDataSet>>(
            "structuredDatasets",
            "Metadata for all datasets detected to be structured (tables)",
        ),
        list_field::<Vec<SemiStructuredDataSet>>(
            "semiStructuredDatasets",
            "Metadata for all datasets detected to be semi-structured",
        ),
        list_field::<Vec<UnstructuredTextDataSet>>(
            "unstructuredTextDatasets",
            "Metadata for all datasets detected to be unstructured text (e.g. txt files)",
        ),
        list_field::<Vec<ImageDataSet>>(
            "imageDatasets",
            "Metadata for all datasets detected to be images",
        ),
        list_field::<Vec<VideoDataSet>>(
            "videoDatasets",
            "Metadata for all datasets detected to be videos",
        ),
        list_field::<Vec<AudioDataSet>>(
            "audioDatasets",
            "Metadata for all datasets detected to be audio",
        ),
        list_field::<Vec<DocumentDataSet>>(
            "documentDatasets",
            "Metadata for all datasets detected to be documents",
        ),
        list_field::<Vec<DatasetTreeNode>>(
            "datasetTree",
            "List of tree nodes that describe the hierarchy of the datasets contained in this extended dataset profile.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "name": "dataset-dummy-name",
            "generatedBy": "edp-test 1.0",
            "freely_available": true,
            "volume": 1024,
            "assetSha256Hash": "ab12"
        })
    }

    #[test]
    fn test_minimal_profile_gets_defaults() {
        let edp = ExtendedDatasetProfile::from_value(minimal()).unwrap();
        assert_eq!(edp.schema_version(), &Version::current());
        assert_eq!(edp.asset_processing_status, Some(AssetProcessingStatus::OriginalData));
        assert!(edp.asset_refs.is_empty());
        assert!(edp.data_types.is_empty());
        assert_eq!(
            edp,
            ExtendedDatasetProfile::new("dataset-dummy-name", "edp-test 1.0", true, 1024, "ab12")
        );
    }

    #[test]
    fn test_explicit_null_processing_status() {
        let mut doc = minimal();
        doc["assetProcessingStatus"] = json!(null);
        let edp = ExtendedDatasetProfile::from_value(doc).unwrap();
        assert_eq!(edp.asset_processing_status, None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut doc = minimal();
        doc["assetId"] = json!("some-identity-string");
        ExtendedDatasetProfile::from_value(doc).unwrap();
    }

    #[test]
    fn test_missing_required_field() {
        let mut doc = minimal();
        doc.as_object_mut().unwrap().remove("generatedBy");
        let err = ExtendedDatasetProfile::from_value(doc).unwrap_err();
        assert!(err.to_string().contains("generatedBy"), "{err}");
    }

    #[test]
    fn test_schema_version_gate() {
        let current = Version::current();
        let mut doc = minimal();
        doc["schemaVersion"] = json!(format!("{}.99.0", current.major()));
        let edp = ExtendedDatasetProfile::from_value(doc).unwrap();
        assert_eq!(edp.schema_version().minor(), 99);

        let mut doc = minimal();
        doc["schemaVersion"] = json!(format!("{}.0.0", current.major() + 1));
        let err = ExtendedDatasetProfile::from_value(doc).unwrap_err();
        let expected = format!(
            "schemaVersion {}.0.0 does not match expected major version '{}'",
            current.major() + 1,
            current.major()
        );
        assert!(err.to_string().contains(&expected), "{err}");

        let mut doc = minimal();
        doc["schemaVersion"] = json!("not a version");
        let err = ExtendedDatasetProfile::from_value(doc).unwrap_err();
        assert!(err.to_string().contains("Invalid schema version 'not a version'"), "{err}");
    }

    #[test]
    fn test_construction_reports_typed_version_errors() {
        let mut doc = minimal();
        doc["schemaVersion"] = json!("1.0.0");
        let err = ExtendedDatasetProfile::from_value(doc.clone()).unwrap_err();
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

        let err = ExtendedDatasetProfile::from_json_str(&doc.to_string()).unwrap_err();
        assert!(matches!(
            err,
            EdpError::SchemaVersion(SchemaVersionError::VersionMismatch { .. })
        ));

        doc["schemaVersion"] = json!(7);
        let err = ExtendedDatasetProfile::from_value(doc).unwrap_err();
        assert!(matches!(
            err,
            EdpError::SchemaVersion(SchemaVersionError::InvalidSchemaVersion { ref value })
                if value == "7"
        ));
    }

    #[test]
    fn test_with_schema_version() {
        let edp = ExtendedDatasetProfile::new("n", "g", false, 0, "h");
        let major = Version::current().major();
        let edp = edp.with_schema_version(&format!("{major}.4.2")).unwrap();
        assert_eq!(edp.schema_version(), &Version::new(major, 4, 2));

        let err = edp.with_schema_version(&format!("{}.0.0", major + 1)).unwrap_err();
        assert!(matches!(err, SchemaVersionError::VersionMismatch { .. }));
    }

    #[test]
    fn test_asset_refs_must_not_be_empty_when_supplied() {
        let mut doc = minimal();
        doc["assetRefs"] = json!([]);
        let err = ExtendedDatasetProfile::from_value(doc).unwrap_err();
        assert!(err.to_string().contains("assetRefs"), "{err}");

        let edp = ExtendedDatasetProfile::new("n", "g", false, 0, "h");
        assert!(matches!(
            edp.with_asset_refs(Vec::new()),
            Err(ValidationError::TooShort { field: "assetRefs", min_length: 1 })
        ));
    }

    #[test]
    fn test_default_profile_round_trips() {
        let edp = ExtendedDatasetProfile::new("n", "g", false, 7, "h");
        let json = edp.to_json_string().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("assetRefs").is_none());
        assert_eq!(value["schemaVersion"], json!(CURRENT_VERSION));
        assert_eq!(value["freely_available"], json!(false));
        assert_eq!(ExtendedDatasetProfile::from_json_str(&json).unwrap(), edp);
    }
}
