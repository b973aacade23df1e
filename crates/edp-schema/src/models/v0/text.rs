//! Unstructured text datasets.

use std::collections::BTreeSet;

use edp_core::{Language, ValidationError};
use serde::{Deserialize, Serialize};

use crate::shape::{field, list_field};

/// A block of text lines, `[start_line, end_line)`, 0-based.
///
/// Construction guarantees `end_line > start_line`, so a chunk is never
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawChunk")]
pub struct Chunk {
    start_line: i64,
    end_line: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChunk {
    start_line: i64,
    end_line: i64,
}

impl TryFrom<RawChunk> for Chunk {
    type Error = ValidationError;

    fn try_from(raw: RawChunk) -> Result<Self, Self::Error> {
        Self::new(raw.start_line, raw.end_line)
    }
}

impl Chunk {
    /// Create a chunk.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyChunk`] unless `end_line > start_line`.
    pub fn new(start_line: i64, end_line: i64) -> Result<Self, ValidationError> {
        if end_line <= start_line {
            return Err(ValidationError::EmptyChunk {
                start_line,
                end_line,
            });
        }
        Ok(Self {
            start_line,
            end_line,
        })
    }

    /// Inclusive start line index.
    pub fn start_line(&self) -> i64 {
        self.start_line
    }

    /// Exclusive end line index.
    pub fn end_line(&self) -> i64 {
        self.end_line
    }

    /// Number of lines, always positive.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.end_line.abs_diff(self.start_line)
    }
}

describe_record!(
    Chunk,
    "Chunk of text identified by its start and end lines. The indices are 0-based.",
    [
        field::<i64>("startLine", "Inclusive start line index."),
        field::<i64>("endLine", "Exclusive end line index."),
    ]
);

/// A table found inside an unstructured text dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEmbeddedTable")]
pub struct EmbeddedTable {
    #[serde(flatten)]
    chunk: Chunk,
    structured_dataset_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEmbeddedTable {
    start_line: i64,
    end_line: i64,
    structured_dataset_name: String,
}

impl TryFrom<RawEmbeddedTable> for EmbeddedTable {
    type Error = ValidationError;

    fn try_from(raw: RawEmbeddedTable) -> Result<Self, Self::Error> {
        Ok(Self {
            chunk: Chunk::new(raw.start_line, raw.end_line)?,
            structured_dataset_name: raw.structured_dataset_name,
        })
    }
}

impl EmbeddedTable {
    /// Create an embedded table spanning `[start_line, end_line)`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyChunk`] unless `end_line > start_line`.
    pub fn new(
        start_line: i64,
        end_line: i64,
        structured_dataset_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            chunk: Chunk::new(start_line, end_line)?,
            structured_dataset_name: structured_dataset_name.into(),
        })
    }

    /// The lines the table occupies.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// Name of the structured dataset this table was analyzed as.
    pub fn structured_dataset_name(&self) -> &str {
        &self.structured_dataset_name
    }
}

describe_record!(
    EmbeddedTable,
    "Marks the existence of a table within a unstructured text dataset.",
    [
        field::<i64>("startLine", "Inclusive start line index."),
        field::<i64>("endLine", "Exclusive end line index."),
        field::<String>(
            "structuredDatasetName",
            "Name of the structured dataset this embedded dataset got analyzed as.",
        ),
    ]
);

/// How often a word occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: i64,
}

describe_record!(WordFrequency, "How often a word occurred.", [
    field::<String>("word", "Word that was counted. This might already be normalized."),
    field::<i64>("count", "Number of times it occurred."),
]);

/// Metadata of a dataset detected to be unstructured text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnstructuredTextDataSet {
    #[serde(default)]
    pub embedded_tables: Vec<EmbeddedTable>,
    pub languages: BTreeSet<Language>,
    #[serde(default)]
    pub word_cloud: Vec<WordFrequency>,
    /// Lines outside embedded tables.
    pub line_count: i64,
    /// Words outside embedded tables.
    pub word_count: i64,
}

describe_record!(
    UnstructuredTextDataSet,
    "Metadata for all datasets detected to be unstructured text (e.g. txt files).",
    [
        list_field::<Vec<EmbeddedTable>>(
            "embeddedTables",
            "Chunks that are identified to contain tables.",
        ),
        field::<BTreeSet<Language>>(
            "languages",
            "Set of ISO639-3 languages identifiers detected in the text.",
        ),
        list_field::<Vec<WordFrequency>>(
            "wordCloud",
            "List of (word, frequency) pairs representing the most frequently occurring words in the text.",
        ),
        field::<i64>(
            "lineCount",
            "Number of lines (excluding embedded tables) inside the text block.",
        ),
        field::<i64>(
            "wordCount",
            "Number of words (excluding embedded tables) inside the text block.",
        ),
    ]
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chunk_requires_end_after_start() {
        assert_eq!(Chunk::new(3, 10).unwrap().len(), 7);
        for (start, end) in [(5, 5), (5, 4)] {
            let err = Chunk::new(start, end).unwrap_err();
            assert_eq!(err.to_string(), "End line index must be larger than start line index!");
        }
    }

    #[test]
    fn test_chunk_deserialization_is_validated() {
        let chunk: Chunk = serde_json::from_value(json!({"startLine": 0, "endLine": 1})).unwrap();
        assert_eq!(chunk.len(), 1);
        let err =
            serde_json::from_value::<Chunk>(json!({"startLine": 2, "endLine": 2})).unwrap_err();
        assert!(err.to_string().contains("End line index must be larger"), "{err}");
    }

    #[test]
    fn test_embedded_table_wire_shape() {
        let table = EmbeddedTable::new(4, 12, "table_0").unwrap();
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value,
            json!({"startLine": 4, "endLine": 12, "structuredDatasetName": "table_0"})
        );
        let back: EmbeddedTable = serde_json::from_value(value).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.chunk().len(), 8);

        assert!(serde_json::from_value::<EmbeddedTable>(
            json!({"startLine": 9, "endLine": 1, "structuredDatasetName": "t"})
        )
        .is_err());
    }

    #[test]
    fn test_languages_are_normalized_and_deduplicated() {
        let text: UnstructuredTextDataSet = serde_json::from_value(json!({
            "languages": ["deu", "Deu", "eng"],
            "lineCount": 10,
            "wordCount": 120
        }))
        .unwrap();
        let codes: Vec<&str> = text.languages.iter().map(Language::as_str).collect();
        assert_eq!(codes, ["deu", "eng"]);
        assert!(text.embedded_tables.is_empty());
        assert!(text.word_cloud.is_empty());
    }

    #[test]
    fn test_languages_reject_two_letter_codes() {
        let err = serde_json::from_value::<UnstructuredTextDataSet>(json!({
            "languages": ["en"],
            "lineCount": 1,
            "wordCount": 1
        }))
        .unwrap_err();
        assert!(err.to_string().contains("\"en\" is not a ISO639-3 language string!"), "{err}");
    }
}
