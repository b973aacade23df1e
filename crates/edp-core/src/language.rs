//! # ISO 639-3 Languages
//!
//! [`Language`] is a closed string type: only the three-letter ISO 639-3
//! codes in the bundled table are accepted. Input is matched
//! case-insensitively and normalized to lower case, so `"Deu"` becomes
//! `"deu"`. Two-letter ISO 639-1 codes (`"en"`) and free text are
//! rejected.

use serde::Serialize;

use crate::error::ValidationError;
use crate::iso639_3::ISO639_3_CODES;

/// Whether `text` is an ISO 639-3 code (exact, lower-case match).
pub fn is_iso639_3(text: &str) -> bool {
    ISO639_3_CODES.binary_search(&text).is_ok()
}

/// Number of codes in the bundled ISO 639-3 table.
pub fn iso639_3_count() -> usize {
    ISO639_3_CODES.len()
}

/// A validated, lower-case ISO 639-3 language code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    /// Validate and normalize a language code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLanguage`] with the lower-cased
    /// input when it is not an ISO 639-3 code.
    pub fn new(text: impl AsRef<str>) -> Result<Self, ValidationError> {
        let normalized = text.as_ref().to_lowercase();
        if is_iso639_3(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(ValidationError::InvalidLanguage(normalized))
        }
    }

    /// The normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl_validating_deserialize!(Language);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_iso639_3() {
        assert!(is_iso639_3("deu"));
        assert!(!is_iso639_3("blabla"));
        assert!(!is_iso639_3("en"));
    }

    #[test]
    fn test_table_is_sorted_and_unique() {
        assert!(ISO639_3_CODES.windows(2).all(|w| w[0] < w[1]));
        assert!(iso639_3_count() > 8_000);
    }

    #[test]
    fn test_language_accepts_set3() {
        assert_eq!(Language::new("deu").unwrap().as_str(), "deu");
    }

    #[test]
    fn test_language_only_set3() {
        assert_eq!(
            Language::new("en").unwrap_err(),
            ValidationError::InvalidLanguage("en".to_string())
        );
    }

    #[test]
    fn test_language_rejects_free_text() {
        let err = Language::new("blalba").unwrap_err();
        assert_eq!(err.to_string(), "\"blalba\" is not a ISO639-3 language string!");
    }

    #[test]
    fn test_language_case_insensitive() {
        let lang: Language = serde_json::from_str("\"Deu\"").unwrap();
        assert_eq!(lang.as_str(), "deu");
        assert_eq!(serde_json::to_string(&lang).unwrap(), "\"deu\"");
    }
}
