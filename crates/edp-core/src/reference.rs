//! # References
//!
//! Two kinds of pointers appear inside an Extended Dataset Profile:
//!
//! - [`FileReference`]: a POSIX-style relative path to an artifact that
//!   accompanies the profile (graphs, spectrograms, box plots).
//! - [`JsonReference`]: a pointer to another value *within the same*
//!   JSON document, written `#/key/key/...` and serialized under the
//!   `$ref` key.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Whether `value` fully matches `#(/[A-Za-z0-9_-]+)+`.
fn is_json_reference(value: &str) -> bool {
    let Some(path) = value.strip_prefix('#') else {
        return false;
    };
    let Some(path) = path.strip_prefix('/') else {
        return false;
    };
    path.split('/').all(|segment| {
        !segment.is_empty()
            && segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    })
}

/// A reference to another field within the same JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JsonReference {
    /// The JSON keys that lead to the referred value.
    #[serde(
        rename = "$ref",
        alias = "reference",
        deserialize_with = "deserialize_reference"
    )]
    reference: String,
}

fn deserialize_reference<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if is_json_reference(&raw) {
        Ok(raw)
    } else {
        Err(serde::de::Error::custom(ValidationError::InvalidJsonReference(raw)))
    }
}

impl JsonReference {
    /// Validate a reference string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidJsonReference`] when `reference`
    /// is not of the form `#/segment[/segment...]` with segments made of
    /// ASCII letters, digits, `_` and `-`.
    pub fn new(reference: impl Into<String>) -> Result<Self, ValidationError> {
        let reference = reference.into();
        if is_json_reference(&reference) {
            Ok(Self { reference })
        } else {
            Err(ValidationError::InvalidJsonReference(reference))
        }
    }

    /// Build a reference from path segments, e.g. `["structuredDatasets", "0"]`.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut reference = String::from("#");
        for segment in segments {
            reference.push('/');
            reference.push_str(segment.as_ref());
        }
        Self::new(reference)
    }

    /// The raw reference string.
    pub fn as_str(&self) -> &str {
        &self.reference
    }

    /// The path segments following `#/`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.reference[2..].split('/')
    }

    /// Resolve the reference against the document it was taken from.
    pub fn resolve<'a>(&self, document: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
        document.pointer(&self.reference[1..])
    }
}

impl std::fmt::Display for JsonReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reference)
    }
}

/// A POSIX path to a file that accompanies the profile.
///
/// Paths are normalized lexically on construction: repeated separators
/// collapse, `.` components are dropped and a trailing separator is
/// removed. `..` components are preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FileReference(String);

impl FileReference {
    /// Create a normalized file reference.
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let absolute = path.starts_with('/');
        let parts: Vec<&str> = path
            .split('/')
            .filter(|p| !p.is_empty() && *p != ".")
            .collect();
        let joined = parts.join("/");
        let normalized = match (absolute, joined.is_empty()) {
            (true, _) => format!("/{joined}"),
            (false, true) => ".".to_string(),
            (false, false) => joined,
        };
        Self(normalized)
    }

    /// The normalized path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component.
    pub fn file_name(&self) -> Option<&str> {
        self.0.rsplit('/').next().filter(|n| !n.is_empty() && *n != ".")
    }

    /// Extension of the final component, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }

    /// Append a relative path.
    pub fn join(&self, child: impl AsRef<str>) -> Self {
        Self::new(format!("{}/{}", self.0, child.as_ref()))
    }
}

impl std::fmt::Display for FileReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileReference {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl<'de> Deserialize<'de> for FileReference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_reference_does_not_match_empty() {
        assert!(JsonReference::new("").is_err());
    }

    #[test]
    fn test_json_reference_does_not_match_exclamation_mark() {
        assert!(JsonReference::new("#/!joa").is_err());
    }

    #[test]
    fn test_json_reference_does_not_match_empty_path_segment() {
        assert!(JsonReference::new("#/hello/world//").is_err());
        assert!(JsonReference::new("#/a//b").is_err());
        assert!(JsonReference::new("#").is_err());
        assert!(JsonReference::new("#/").is_err());
    }

    #[test]
    fn test_json_reference_matches_paths() {
        for ok in ["#/hello/world", "#/hello/world/1", "#/hello_world", "#/hello-world", "#/a/b"] {
            assert!(JsonReference::new(ok).is_ok(), "{ok} should be accepted");
        }
    }

    #[test]
    fn test_json_reference_error_message() {
        let err = JsonReference::new("#/!x").unwrap_err();
        assert_eq!(err.to_string(), "The string \"#/!x\" is not a JSON reference!");
    }

    #[test]
    fn test_json_reference_wire_name_and_alias() {
        let r = JsonReference::new("#/structuredDatasets/0").unwrap();
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value, json!({"$ref": "#/structuredDatasets/0"}));

        let via_alias: JsonReference =
            serde_json::from_value(json!({"reference": "#/structuredDatasets/0"})).unwrap();
        assert_eq!(via_alias, r);

        let bad = serde_json::from_value::<JsonReference>(json!({"$ref": "#/a//b"}));
        assert!(bad.unwrap_err().to_string().contains("is not a JSON reference"));
    }

    #[test]
    fn test_json_reference_resolve() {
        let doc = json!({"structuredDatasets": [{"rowCount": 3}]});
        let r = JsonReference::from_segments(["structuredDatasets", "0", "rowCount"]).unwrap();
        assert_eq!(r.resolve(&doc), Some(&json!(3)));
        assert_eq!(r.segments().collect::<Vec<_>>(), ["structuredDatasets", "0", "rowCount"]);
    }

    #[test]
    fn test_file_reference_normalizes() {
        assert_eq!(FileReference::new("graphs//box.png").as_str(), "graphs/box.png");
        assert_eq!(FileReference::new("./graphs/box.png/").as_str(), "graphs/box.png");
        assert_eq!(FileReference::new("/abs/x").as_str(), "/abs/x");
        assert_eq!(FileReference::new("").as_str(), ".");
    }

    #[test]
    fn test_file_reference_components() {
        let f = FileReference::new("graphs/col_a/box.plot.png");
        assert_eq!(f.file_name(), Some("box.plot.png"));
        assert_eq!(f.extension(), Some("png"));
        assert_eq!(FileReference::new("graphs/.hidden").extension(), None);
        assert_eq!(f.join("../x").as_str(), "graphs/col_a/box.plot.png/../x");
    }
}
