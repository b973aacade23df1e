//! # Catalog v0
//!
//! The first published revision of the Extended Dataset Profile,
//! registered under [`SchemaVersion::V0`](crate::registry::SchemaVersion::V0).
//!
//! ## Wire Names
//!
//! Field names on the wire are camelCase, except for a handful of
//! snake_case names kept for compatibility with existing documents:
//! `freely_available`, `original_series`, `all_entries_are_unique`,
//! `monotonically_increasing` and `monotonically_decreasing`. JSON
//! references are written under `$ref`.
//!
//! ## Required but Nullable
//!
//! Some fields have no default yet accept `null`, e.g. the image quality
//! measurements. The key must be present; `null` means the analysis
//! could not determine the value.

mod archive;
mod asset;
mod enums;
mod media;
mod numeric;
mod profile;
mod tabular;
mod text;

pub use archive::{ArchiveDataSet, DatasetTreeNode, FileProperties};
pub use asset::{AssetReference, DataSpace, License, Publisher};
pub use edp_core::{FileReference, JsonReference, Language};
pub use enums::{
    AssetGrowthRate, AssetImmutability, AssetProcessingStatus, AssetTransferType,
    AssetUpdatePeriod, DataSetCompression, DataSetType, ImageColorMode, ModificationState, Trend,
    VideoPixelFormat,
};
pub use media::{AudioDataSet, DocumentDataSet, ImageDPI, ImageDataSet, Resolution, VideoDataSet};
pub use numeric::Numeric;
pub use profile::ExtendedDatasetProfile;
pub use tabular::{
    Augmentation, ColumnBase, ColumnRef, CorrelationSummary, DateTimeColumn, NumericColumn,
    SemiStructuredDataSet, StringColumn, StructuredDataSet, TemporalConsistency, TemporalCover,
    TimeBasedGraph,
};
pub use text::{Chunk, EmbeddedTable, UnstructuredTextDataSet, WordFrequency};
