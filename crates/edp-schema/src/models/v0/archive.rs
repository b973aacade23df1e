//! Archives, files and the dataset tree.

use edp_core::JsonReference;
use serde::{Deserialize, Serialize};

use super::enums::DataSetType;
use crate::models::required_nullable;
use crate::shape::{field, nullable_field};

/// Properties of the file a dataset is stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProperties {
    pub name: String,
    pub file_type: String,
    /// Size in bytes.
    pub size: i64,
}

describe_record!(FileProperties, "Properties regarding files that a dataset might be stored in.", [
    field::<String>("name", "Original file name"),
    field::<String>("fileType", "File type"),
    field::<i64>("size", "Size of the file in bytes."),
]);

/// A node of the tree describing how datasets nest inside an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetTreeNode {
    pub dataset: JsonReference,
    pub dataset_type: DataSetType,
    #[serde(default)]
    pub parent: Option<JsonReference>,
    pub name: String,
    #[serde(deserialize_with = "required_nullable")]
    pub file_properties: Option<FileProperties>,
}

describe_record!(
    DatasetTreeNode,
    "Tree node representing a dataset. The tree represents the semantic structure of the datasets inside an asset.",
    [
        field::<JsonReference>("dataset", "Reference to the dataset this node refers to."),
        field::<DataSetType>("datasetType", "Type of the dataset this tree node belongs to."),
        nullable_field::<Option<JsonReference>>(
            "parent",
            "Reference to the dataset tree node of the parent dataset, if any",
        ),
        field::<String>("name", "Name of the dataset"),
        field::<Option<FileProperties>>(
            "fileProperties",
            "File specific properties, if this dataset is a file. Otherwise none.",
        ),
    ]
);

/// Metadata of an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveDataSet {
    pub algorithm: String,
    /// Extracted size in bytes, not counting nested archives.
    pub extracted_size: i64,
}

describe_record!(ArchiveDataSet, "Dataset representing an archive.", [
    field::<String>("algorithm", "Compression algorithm used by this archive."),
    field::<i64>(
        "extractedSize",
        "Size in bytes when the archive is extracted. Does not include recursive archives.",
    ),
]);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tree_node_parent_defaults_to_none() {
        let node: DatasetTreeNode = serde_json::from_value(json!({
            "dataset": {"$ref": "#/archiveDatasets/0"},
            "datasetType": "archive",
            "name": "bundle.zip",
            "fileProperties": {"name": "bundle.zip", "fileType": "zip", "size": 2048}
        }))
        .unwrap();
        assert!(node.parent.is_none());
        assert_eq!(node.dataset.as_str(), "#/archiveDatasets/0");
        assert_eq!(node.file_properties.unwrap().size, 2048);
    }

    #[test]
    fn test_tree_node_file_properties_must_be_present() {
        let err = serde_json::from_value::<DatasetTreeNode>(json!({
            "dataset": {"$ref": "#/archiveDatasets/0"},
            "datasetType": "archive",
            "name": "bundle.zip"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("fileProperties"), "{err}");

        let node: DatasetTreeNode = serde_json::from_value(json!({
            "dataset": {"$ref": "#/structuredDatasets/0"},
            "datasetType": "structured",
            "parent": {"$ref": "#/datasetTree/0"},
            "name": "table.csv",
            "fileProperties": null
        }))
        .unwrap();
        assert!(node.file_properties.is_none());
        assert_eq!(node.parent.unwrap().as_str(), "#/datasetTree/0");
    }

    #[test]
    fn test_tree_node_rejects_bad_reference() {
        let err = serde_json::from_value::<DatasetTreeNode>(json!({
            "dataset": {"$ref": "archiveDatasets/0"},
            "datasetType": "archive",
            "name": "bundle.zip",
            "fileProperties": null
        }))
        .unwrap_err();
        assert!(err.to_string().contains("is not a JSON reference"), "{err}");
    }
}
