//! # edp-schema — Extended Dataset Profile Schema
//!
//! The field catalog of the Extended Dataset Profile (EDP), the rules
//! that keep it evolvable, and the tooling that publishes it.
//!
//! ## Field Catalog (`models`)
//!
//! [`models::v0`] holds every record and enumeration of the first
//! published revision, rooted at [`ExtendedDatasetProfile`]. Field rules
//! (bounds, required-but-nullable fields, cross-field constraints and the
//! `schemaVersion` gate) run during deserialization.
//!
//! ## Type Descriptors (`shape`)
//!
//! Every catalog type implements [`Describe`], producing a [`TypeShape`]
//! tree. The tree is the single source for the static index check, the
//! JSON Schema export, the Markdown field reference and document
//! validation.
//!
//! ## Versioning (`compat`, `registry`)
//!
//! - [`VersionedSchema`] ties a root record to its expected version and
//!   rejects documents written against another major version.
//! - [`SchemaVersion`] enumerates the registered revisions;
//!   [`current_schema`] is the latest.
//!
//! ## Static Indexability (`index`)
//!
//! [`StaticIndexValidator`] walks a descriptor tree and rejects shapes
//! that a search index cannot map to stable typed columns, such as
//! unions of records or unbounded key spaces.
//!
//! ## Export and Validation (`export`, `markdown`, `validate`)
//!
//! - [`json_schema`] / [`export`] produce a Draft 2020-12 JSON Schema or a
//!   Markdown field reference.
//! - [`DocumentValidator`] checks JSON profiles against the exported
//!   schema and reports every rejected field by its catalog path.
//!
//! ## Crate Policy
//!
//! - Depends only on `edp-core` internally.
//! - Wire names and error messages are part of the public contract.
//! - A new catalog revision is a new `models` submodule plus a
//!   [`SchemaVersion`] variant; published revisions are never edited in
//!   incompatible ways.

pub mod compat;
pub mod export;
pub mod index;
pub mod markdown;
pub mod models;
pub mod registry;
pub mod shape;
pub mod validate;

pub use compat::{check_major_version, deserialize_schema_version, VersionedSchema};
pub use export::{
    export, export_schema, json_schema, resolve_output_path, resolve_output_path_for,
    ExportError, ExportFormat, DEFAULT_MARKDOWN_FILE_NAME, DEFAULT_SCHEMA_FILE_NAME,
};
pub use index::{AllowedUnion, IndexPolicy, StaticIndexValidator, StructuralViolation};
pub use markdown::document_schema;
pub use models::v0::ExtendedDatasetProfile;
pub use registry::{current_schema, registered_schemas, schema_entry, SchemaEntry, SchemaVersion};
pub use shape::{Describe, FieldShape, TypeShape};
pub use validate::{
    field_path, DocumentValidationError, DocumentValidator, FieldViolation, SchemaViolations,
};
