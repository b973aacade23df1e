//! Where an asset is published and under which terms.

use chrono::{DateTime, Utc};
use edp_core::ValidationError;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::shape::{field, nullable_field};

/// The entity that uploaded an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

describe_record!(Publisher, "The entity that uploaded a data set / asset.", [
    field::<String>("name", "Name of the publisher"),
    nullable_field::<Option<String>>("url", "URL to the publisher"),
]);

/// A license, identified by a name, a URL or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLicense")]
pub struct License {
    name: Option<String>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct RawLicense {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl TryFrom<RawLicense> for License {
    type Error = ValidationError;

    fn try_from(raw: RawLicense) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.url)
    }
}

impl License {
    /// Create a license.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LicenseIncomplete`] if both `name` and
    /// `url` are `None`.
    pub fn new(name: Option<String>, url: Option<String>) -> Result<Self, ValidationError> {
        if name.is_none() && url.is_none() {
            return Err(ValidationError::LicenseIncomplete);
        }
        Ok(Self { name, url })
    }

    /// A license known by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: None,
        }
    }

    /// A license known by URL only.
    pub fn at_url(url: impl Into<String>) -> Self {
        Self {
            name: None,
            url: Some(url.into()),
        }
    }

    /// Name of the license.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// URL describing the license.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

describe_record!(
    License,
    "A license of some sort. Can contain a name and URL, but must specify at least one.",
    [
        nullable_field::<Option<String>>("name", "Name of the license"),
        nullable_field::<Option<String>>("url", "URL describing the license"),
    ]
);

/// A data space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSpace {
    pub name: String,
    pub url: String,
}

describe_record!(DataSpace, "Represents a data space.", [
    field::<String>("name", "Name of the data space"),
    field::<String>("url", "URL of the data space"),
]);

/// Where an asset can be found in a data space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetReference {
    pub asset_id: String,
    pub asset_url: Url,
    #[serde(default)]
    pub asset_version: Option<String>,
    pub data_space: DataSpace,
    pub publisher: Publisher,
    pub publish_date: DateTime<Utc>,
    pub license: License,
}

describe_record!(AssetReference, "Reference to a dataset in a data space.", [
    field::<String>("assetId", "Unique identifier for an asset within the data space"),
    field::<Url>("assetUrl", "URL where the asset can be found in the published data space"),
    nullable_field::<Option<String>>("assetVersion", "Provide supplied version of the asset"),
    field::<DataSpace>("dataSpace", "Data space the asset can be found in"),
    field::<Publisher>("publisher", "Provider that placed the asset in the data room"),
    field::<DateTime<Utc>>("publishDate", "Date on which this asset has been published"),
    field::<License>(
        "license",
        "Describes the data license under which the asset is made available by the data provider (see also https://www.dcat-ap.de/def/licenses/)",
    ),
]);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_license_accepts_name_url_or_both() {
        License::new(None, Some("http://mylicense.com".into())).unwrap();
        License::new(Some("MIT".into()), None).unwrap();
        let both = License::new(Some("MIT".into()), Some("http://mylicense.com".into())).unwrap();
        assert_eq!(both.name(), Some("MIT"));
        assert_eq!(both.url(), Some("http://mylicense.com"));
    }

    #[test]
    fn test_license_requires_name_or_url() {
        let err = License::new(None, None).unwrap_err();
        assert_eq!(err.to_string(), "License model needs at least 'name' or 'url'");

        let err = serde_json::from_value::<License>(json!({})).unwrap_err();
        assert!(err.to_string().contains("License model needs at least 'name' or 'url'"));
        let err =
            serde_json::from_value::<License>(json!({"name": null, "url": null})).unwrap_err();
        assert!(err.to_string().contains("License model needs at least 'name' or 'url'"));
    }

    #[test]
    fn test_license_serializes_both_keys() {
        let value = serde_json::to_value(License::named("CC-BY-4.0")).unwrap();
        assert_eq!(value, json!({"name": "CC-BY-4.0", "url": null}));
        assert_eq!(License::at_url("https://x.org/l").name(), None);
    }

    #[test]
    fn test_asset_reference_requires_absolute_url() {
        let mut doc = json!({
            "assetId": "asset-1",
            "assetUrl": "https://dataspace.example.org/assets/asset-1",
            "dataSpace": {"name": "Mobility", "url": "https://dataspace.example.org"},
            "publisher": {"name": "ACME"},
            "publishDate": "2024-05-01T12:00:00Z",
            "license": {"name": "MIT"}
        });
        let reference: AssetReference = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(reference.asset_url.host_str(), Some("dataspace.example.org"));
        assert!(reference.asset_version.is_none());

        doc["assetUrl"] = json!("assets/asset-1");
        assert!(serde_json::from_value::<AssetReference>(doc).is_err());
    }
}
