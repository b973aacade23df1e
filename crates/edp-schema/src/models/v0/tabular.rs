//! Structured (tabular) and semi-structured datasets.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use edp_core::FileReference;
use serde::{Deserialize, Serialize};

use super::enums::Trend;
use super::numeric::Numeric;
use crate::models::required_nullable;
use crate::shape::{field, list_field, nullable_field, FieldShape, TypeShape};

/// How many gaps and unique values are present when resampled to a given
/// time scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalConsistency {
    pub time_scale: String,
    pub different_abundancies: i64,
    pub stable: bool,
    pub number_of_gaps: i64,
}

describe_record!(
    TemporalConsistency,
    "How many gaps and unique values are present when resampled to a given time scale.",
    [
        field::<String>("timeScale", "Time scale this temporal consistency has been tested for"),
        field::<i64>("differentAbundancies", "Number of unique values on given time resolution"),
        field::<bool>("stable", "The value stays stable on the given time resolution"),
        field::<i64>("numberOfGaps", "Number of gaps at the given timescale"),
    ]
);

/// Information about how a column has been augmented or created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Augmentation {
    pub source_columns: Vec<String>,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub parameters: Vec<String>,
}

describe_record!(
    Augmentation,
    "Information about how a column of a dataset has been augmented or created.",
    [
        field::<Vec<String>>(
            "sourceColumns",
            "List of source columns on which the augmented column is based",
        ),
        nullable_field::<Option<String>>(
            "formula",
            "The calculation that was applied to the source columns to create the augmented column",
        ),
        list_field::<Vec<String>>("parameters", "The parameters used for the calculation"),
    ]
);

/// Properties shared by every column kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnBase {
    pub name: String,
    pub null_count: i64,
    pub inconsistent_count: i64,
    pub interpretable_count: i64,
    pub number_unique: i64,
    #[serde(default)]
    pub augmentation: Option<Augmentation>,
}

impl ColumnBase {
    /// A column with the given name and all counts at zero.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            null_count: 0,
            inconsistent_count: 0,
            interpretable_count: 0,
            number_unique: 0,
            augmentation: None,
        }
    }

    fn field_shapes() -> Vec<FieldShape> {
        vec![
            field::<String>("name", "Name of the column"),
            field::<i64>(
                "nullCount",
                "Number of empty and null entries in the column. Does not include the count of inconsistent entries.",
            ),
            field::<i64>(
                "inconsistentCount",
                "Number of entries which are inconsistent with the determined data type of this column.",
            ),
            field::<i64>(
                "interpretableCount",
                "Number of entries which are not empty and could be converted to the determined type of this column.",
            ),
            field::<i64>("numberUnique", "Number of unique values."),
            nullable_field::<Option<Augmentation>>(
                "augmentation",
                "If this column was augmented this field contains all relevant information",
            ),
        ]
    }
}

/// Lay out column fields behind the shared base fields.
fn column_fields(own: Vec<FieldShape>) -> Vec<FieldShape> {
    let mut fields = ColumnBase::field_shapes();
    fields.extend(own);
    fields
}

/// A graph that uses a date-time column as its X axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBasedGraph {
    pub time_base_column: String,
    pub file: FileReference,
}

describe_record!(TimeBasedGraph, "Represents a graph that contains a date time column as X axis.", [
    field::<String>("timeBaseColumn", "Name of the date time column which was used as time base"),
    field::<FileReference>("file", "File which contains the image of the graph"),
]);

range_deserializer!(relative_outlier_count: f64, "relativeOutlierCount", 0.0, 1.0);

/// Statistics of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericColumn {
    #[serde(flatten)]
    pub base: ColumnBase,
    pub min: Numeric,
    pub max: Numeric,
    pub mean: Numeric,
    pub median: Numeric,
    pub variance: Numeric,
    pub stddev: Numeric,
    pub upper_percentile: Numeric,
    pub lower_percentile: Numeric,
    pub percentile_outlier_count: i64,
    pub upper_quantile: Numeric,
    pub lower_quantile: Numeric,
    pub quantile_outlier_count: i64,
    pub upper_z_score: Numeric,
    pub lower_z_score: Numeric,
    pub z_score_outlier_count: i64,
    #[serde(rename = "upperIQR")]
    pub upper_iqr: Numeric,
    #[serde(rename = "lowerIQR")]
    pub lower_iqr: Numeric,
    pub iqr: Numeric,
    pub iqr_outlier_count: i64,
    #[serde(deserialize_with = "relative_outlier_count")]
    pub relative_outlier_count: f64,
    pub distribution: String,
    #[serde(default)]
    pub distribution_graph: Option<FileReference>,
    pub box_plot: FileReference,
    pub trend: Trend,
    #[serde(rename = "original_series", default)]
    pub original_series: Vec<TimeBasedGraph>,
    #[serde(default)]
    pub seasonalities: Vec<TimeBasedGraph>,
    #[serde(default)]
    pub trends: Vec<TimeBasedGraph>,
    #[serde(default)]
    pub residuals: Vec<TimeBasedGraph>,
    pub data_type: String,
}

impl crate::shape::Describe for NumericColumn {
    fn shape() -> TypeShape {
        TypeShape::Record(crate::shape::RecordShape::new(
            "NumericColumn",
            "Information on numeric columns inside a structured dataset.",
            || {
                column_fields(vec![
                    field::<Numeric>("min", "Minimum value that occurred in this column"),
                    field::<Numeric>("max", "Maximum value that occurred in this column"),
                    field::<Numeric>("mean", "Mean of all values in this column"),
                    field::<Numeric>("median", "Median of all values in this column"),
                    field::<Numeric>("variance", "Statistical variance of this column"),
                    field::<Numeric>("stddev", "Statistical standard deviation of this column"),
                    field::<Numeric>("upperPercentile", "Value of the upper 1% quantile"),
                    field::<Numeric>("lowerPercentile", "Value of the lower 1% quantile"),
                    field::<i64>(
                        "percentileOutlierCount",
                        "Number of elements in the lower or upper percentile",
                    ),
                    field::<Numeric>("upperQuantile", "Value of the upper 25% quantile"),
                    field::<Numeric>("lowerQuantile", "Value of the lower 25% quantile"),
                    field::<i64>(
                        "quantileOutlierCount",
                        "Number of elements in the lower or upper quantile",
                    ),
                    field::<Numeric>("upperZScore", "Value of the upper standard score"),
                    field::<Numeric>("lowerZScore", "Value of the lower standard score"),
                    field::<i64>(
                        "zScoreOutlierCount",
                        "Number of elements outside the lower and upper standard scores",
                    ),
                    field::<Numeric>(
                        "upperIQR",
                        "Value of the upper limit of the inter quartile range (25%)",
                    ),
                    field::<Numeric>(
                        "lowerIQR",
                        "Value of the lower limit of the inter quartile range (25%)",
                    ),
                    field::<Numeric>("iqr", "Value of the inter quartile range"),
                    field::<i64>(
                        "iqrOutlierCount",
                        "Number of elements outside of the inter quartile range",
                    ),
                    field::<f64>(
                        "relativeOutlierCount",
                        "Averages all outlier counts into a relative outlier measure [0.0, 1.0].",
                    )
                    .with_range(0.0, 1.0),
                    field::<String>(
                        "distribution",
                        "The best fitting distribution for the data in this column",
                    ),
                    nullable_field::<Option<FileReference>>(
                        "distributionGraph",
                        "Link to the combined histogram/distribution graph",
                    ),
                    field::<FileReference>("boxPlot", "Link to the box plot of this column"),
                    field::<Trend>("trend", "Whether the series has a trend over time"),
                    list_field::<Vec<TimeBasedGraph>>(
                        "original_series",
                        "Original data graphs over all available date time columns",
                    ),
                    list_field::<Vec<TimeBasedGraph>>(
                        "seasonalities",
                        "Seasonality graphs over all available date time columns",
                    ),
                    list_field::<Vec<TimeBasedGraph>>(
                        "trends",
                        "Trend graphs over all available date time columns",
                    ),
                    list_field::<Vec<TimeBasedGraph>>(
                        "residuals",
                        "Residual graphs over all available date time columns",
                    ),
                    field::<String>(
                        "dataType",
                        "More specific type the data in this column can be represented at without loosing information",
                    ),
                ])
            },
        ))
    }
}

/// The date-time range covered by a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalCover {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

describe_record!(TemporalCover, "The datetime range covered by a dataset.", [
    field::<DateTime<Utc>>("earliest", "Earliest timestamp present in the dataset"),
    field::<DateTime<Utc>>("latest", "Latest timestamp present in the dataset"),
]);

/// Statistics of a date-time column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeColumn {
    #[serde(flatten)]
    pub base: ColumnBase,
    pub temporal_cover: TemporalCover,
    #[serde(rename = "all_entries_are_unique")]
    pub all_entries_are_unique: bool,
    #[serde(rename = "monotonically_increasing")]
    pub monotonically_increasing: bool,
    #[serde(rename = "monotonically_decreasing")]
    pub monotonically_decreasing: bool,
    #[serde(default)]
    pub periodicity: Option<String>,
    pub temporal_consistencies: Vec<TemporalConsistency>,
    pub format: String,
}

impl crate::shape::Describe for DateTimeColumn {
    fn shape() -> TypeShape {
        TypeShape::Record(crate::shape::RecordShape::new(
            "DateTimeColumn",
            "Information specific to columns containing date times.",
            || {
                column_fields(vec![
                    field::<TemporalCover>(
                        "temporalCover",
                        "The datetime range covered by a dataset",
                    ),
                    field::<bool>(
                        "all_entries_are_unique",
                        "Whether every timestamp in this column only ever exists once",
                    ),
                    field::<bool>(
                        "monotonically_increasing",
                        "True when every timestamp is later than the previous one",
                    ),
                    field::<bool>(
                        "monotonically_decreasing",
                        "True when every timestamp is earlier than the previous one",
                    ),
                    nullable_field::<Option<String>>(
                        "periodicity",
                        "The main periodicity found for this column",
                    ),
                    field::<Vec<TemporalConsistency>>(
                        "temporalConsistencies",
                        "Temporal consistency at given timescale",
                    ),
                    field::<String>("format", "Datetime format used for parsing"),
                ])
            },
        ))
    }
}

/// Statistics of a column that could only be read as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringColumn {
    #[serde(flatten)]
    pub base: ColumnBase,
    #[serde(deserialize_with = "required_nullable")]
    pub distribution_graph: Option<FileReference>,
}

impl crate::shape::Describe for StringColumn {
    fn shape() -> TypeShape {
        TypeShape::Record(crate::shape::RecordShape::new(
            "StringColumn",
            "Information of columns containing string.",
            || {
                column_fields(vec![field::<Option<FileReference>>(
                    "distributionGraph",
                    "Graph of the distribution of string values, if enough unique values where present.",
                )])
            },
        ))
    }
}

/// How often each kind of correlation occurs between column pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    #[serde(default)]
    pub no: i64,
    #[serde(default)]
    pub partial: i64,
    #[serde(default)]
    pub strong: i64,
}

describe_record!(
    CorrelationSummary,
    "Information about how often which kind of correlation is present.",
    [
        FieldShape::defaulted(
            "no",
            TypeShape::primitive(crate::shape::PrimitiveKind::Integer),
            0.into(),
            "Count of column pairs with no correlation",
        ),
        FieldShape::defaulted(
            "partial",
            TypeShape::primitive(crate::shape::PrimitiveKind::Integer),
            0.into(),
            "Count of column pairs with partial correlation",
        ),
        FieldShape::defaulted(
            "strong",
            TypeShape::primitive(crate::shape::PrimitiveKind::Integer),
            0.into(),
            "Count of column pairs with strong correlation",
        ),
    ]
);

/// A borrowed column of any kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnRef<'a> {
    Numeric(&'a NumericColumn),
    DateTime(&'a DateTimeColumn),
    String(&'a StringColumn),
}

impl<'a> ColumnRef<'a> {
    /// Properties shared by every column kind.
    pub fn base(&self) -> &'a ColumnBase {
        match self {
            Self::Numeric(c) => &c.base,
            Self::DateTime(c) => &c.base,
            Self::String(c) => &c.base,
        }
    }

    /// Column name.
    pub fn name(&self) -> &'a str {
        &self.base().name
    }
}

/// Metadata of a dataset detected to be structured (a table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDataSet {
    pub row_count: i64,
    pub column_count: i64,
    pub numeric_column_count: i64,
    pub datetime_column_count: i64,
    pub string_column_count: i64,
    #[serde(default)]
    pub correlation_graph: Option<FileReference>,
    pub correlation_summary: CorrelationSummary,
    pub numeric_columns: Vec<NumericColumn>,
    pub datetime_columns: Vec<DateTimeColumn>,
    pub string_columns: Vec<StringColumn>,
    #[serde(default)]
    pub primary_datetime_column: Option<String>,
}

impl StructuredDataSet {
    /// Every column: numeric first, then date-time, then string.
    pub fn all_columns(&self) -> impl Iterator<Item = ColumnRef<'_>> {
        self.numeric_columns
            .iter()
            .map(ColumnRef::Numeric)
            .chain(self.datetime_columns.iter().map(ColumnRef::DateTime))
            .chain(self.string_columns.iter().map(ColumnRef::String))
    }

    /// Columns keyed by name. A later column shadows an earlier one with
    /// the same name.
    pub fn columns_by_name(&self) -> BTreeMap<&str, ColumnRef<'_>> {
        self.all_columns().map(|c| (c.name(), c)).collect()
    }
}

describe_record!(
    StructuredDataSet,
    "Metadata for all datasets detected to be structured (tables).",
    [
        field::<i64>("rowCount", "Number of rows"),
        field::<i64>("columnCount", "Number of columns"),
        field::<i64>("numericColumnCount", "Numeric column count"),
        field::<i64>("datetimeColumnCount", "Datetime column count"),
        field::<i64>("stringColumnCount", "String column count"),
        nullable_field::<Option<FileReference>>(
            "correlationGraph",
            "Reference to a correlation graph of the data columns",
        ),
        field::<CorrelationSummary>(
            "correlationSummary",
            "Mapping from correlation level to count of occurrences",
        ),
        field::<Vec<NumericColumn>>("numericColumns", "Numeric columns in this dataset"),
        field::<Vec<DateTimeColumn>>("datetimeColumns", "Datetime columns in this dataset"),
        field::<Vec<StringColumn>>(
            "stringColumns",
            "Columns that could only be interpreted as string by the analysis",
        ),
        nullable_field::<Option<String>>(
            "primaryDatetimeColumn",
            "Name of the datetime column that was determined to be the primary one.",
        ),
    ]
);

/// Metadata of a dataset detected to be semi-structured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemiStructuredDataSet {
    pub json_schema: String,
}

describe_record!(
    SemiStructuredDataSet,
    "Metadata for all datasets detected to be semi-structured.",
    [
        field::<String>("jsonSchema", "JSON schema of the semi-structured data"),
    ]
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numeric_column(name: &str) -> serde_json::Value {
        let mut column = json!({
            "name": name,
            "nullCount": 0,
            "inconsistentCount": 1,
            "interpretableCount": 99,
            "numberUnique": 42,
            "distribution": "normal",
            "boxPlot": "graphs/box.png",
            "trend": "No Trend",
            "dataType": "float64"
        });
        let stats = json!({
            "min": 0, "max": 10.5, "mean": 4.2, "median": 4, "variance": 1.1, "stddev": 1.05,
            "upperPercentile": 9, "lowerPercentile": 1, "percentileOutlierCount": 2,
            "upperQuantile": 7, "lowerQuantile": 2, "quantileOutlierCount": 0,
            "upperZScore": 3.0, "lowerZScore": -3.0, "zScoreOutlierCount": 0,
            "upperIQR": 12.5, "lowerIQR": -3.5, "iqr": 5, "iqrOutlierCount": 0,
            "relativeOutlierCount": 0.02
        });
        if let (Some(column), serde_json::Value::Object(stats)) = (column.as_object_mut(), stats) {
            column.extend(stats);
        }
        column
    }

    fn string_column(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "nullCount": 0,
            "inconsistentCount": 0,
            "interpretableCount": 10,
            "numberUnique": 3,
            "distributionGraph": null
        })
    }

    #[test]
    fn test_numeric_column_flattens_base_and_defaults_lists() {
        let column: NumericColumn = serde_json::from_value(numeric_column("speed")).unwrap();
        assert_eq!(column.base.name, "speed");
        assert_eq!(column.min, Numeric::Integer(0));
        assert_eq!(column.max, Numeric::Float(10.5));
        assert!(column.original_series.is_empty());
        assert!(column.distribution_graph.is_none());

        let back = serde_json::to_value(&column).unwrap();
        assert_eq!(back["upperIQR"], json!(12.5));
        assert_eq!(back["original_series"], json!([]));
        assert_eq!(back["nullCount"], json!(0));
    }

    #[test]
    fn test_relative_outlier_count_is_bounded() {
        let mut doc = numeric_column("speed");
        doc["relativeOutlierCount"] = json!(1.5);
        let err = serde_json::from_value::<NumericColumn>(doc).unwrap_err();
        assert!(err.to_string().contains("relativeOutlierCount"), "{err}");
    }

    #[test]
    fn test_string_column_requires_distribution_graph_key() {
        serde_json::from_value::<StringColumn>(string_column("city")).unwrap();

        let mut doc = string_column("city");
        doc.as_object_mut().unwrap().remove("distributionGraph");
        let err = serde_json::from_value::<StringColumn>(doc).unwrap_err();
        assert!(err.to_string().contains("distributionGraph"), "{err}");
    }

    #[test]
    fn test_correlation_summary_defaults_to_zero() {
        let summary: CorrelationSummary = serde_json::from_value(json!({"strong": 2})).unwrap();
        assert_eq!(summary, CorrelationSummary { no: 0, partial: 0, strong: 2 });
    }

    #[test]
    fn test_all_columns_and_lookup() {
        let dataset: StructuredDataSet = serde_json::from_value(json!({
            "rowCount": 100,
            "columnCount": 2,
            "numericColumnCount": 1,
            "datetimeColumnCount": 0,
            "stringColumnCount": 1,
            "correlationSummary": {},
            "numericColumns": [numeric_column("speed")],
            "datetimeColumns": [],
            "stringColumns": [string_column("city")]
        }))
        .unwrap();

        let names: Vec<&str> = dataset.all_columns().map(|c| c.name()).collect();
        assert_eq!(names, ["speed", "city"]);

        let by_name = dataset.columns_by_name();
        assert!(matches!(by_name.get("speed"), Some(ColumnRef::Numeric(_))));
        assert!(matches!(by_name.get("city"), Some(ColumnRef::String(_))));
        assert_eq!(by_name["city"].base().number_unique, 3);
    }
}
