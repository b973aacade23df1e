//! Integration test: every registered schema is statically indexable.
//!
//! Runs the structural validator over each registry entry under its own
//! policy, and checks that the per-revision union allow-lists behave as
//! published: the legacy policy accepts a `Numeric` alias carrying a
//! complex member, the current one does not.

use edp_schema::shape::{PrimitiveKind, RecordShape, TypeShape};
use edp_schema::{
    current_schema, registered_schemas, IndexPolicy, SchemaVersion, StaticIndexValidator,
    StructuralViolation,
};

fn legacy_numeric() -> TypeShape {
    TypeShape::named_union(
        "Numeric",
        vec![
            TypeShape::primitive(PrimitiveKind::Integer),
            TypeShape::primitive(PrimitiveKind::Float),
            TypeShape::primitive(PrimitiveKind::Duration),
            TypeShape::primitive(PrimitiveKind::Complex),
        ],
    )
}

fn legacy_column() -> TypeShape {
    TypeShape::Record(RecordShape::new("LegacyColumn", "", || {
        vec![
            edp_schema::FieldShape::required("min", legacy_numeric(), ""),
            edp_schema::FieldShape::required("max", legacy_numeric(), ""),
        ]
    }))
}

#[test]
fn test_every_registered_schema_is_indexable() {
    let entries = registered_schemas();
    assert_eq!(entries.len(), SchemaVersion::ALL.len());
    for entry in entries {
        if let Err(violation) = entry.check_indexable() {
            panic!("{} ({}) is not indexable: {violation}", entry.name, entry.version);
        }
    }
}

#[test]
fn test_current_schema_passes_strict_numeric_policy_only_with_alias() {
    let shape = current_schema().shape();
    StaticIndexValidator::new(IndexPolicy::current())
        .validate(&shape)
        .unwrap();

    let err = StaticIndexValidator::new(IndexPolicy::strict())
        .validate(&shape)
        .unwrap_err();
    assert!(matches!(err, StructuralViolation::AmbiguousUnion { .. }), "{err}");
    assert!(err.path().contains("min"), "{}", err.path());
}

#[test]
fn test_complex_numeric_only_passes_legacy_policy() {
    StaticIndexValidator::new(IndexPolicy::legacy())
        .validate(&legacy_column())
        .unwrap();

    let err = StaticIndexValidator::new(IndexPolicy::current())
        .validate(&legacy_column())
        .unwrap_err();
    assert_eq!(err.path(), "LegacyColumn.min");
}
