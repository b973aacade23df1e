//! # Static Indexability Validator
//!
//! Confirms that a schema type can be flattened into a static,
//! schema-stable document index: no field may allow two physically
//! different JSON shapes at the same path across instances, and no field
//! may allow caller-defined keys.
//!
//! ## Case Table
//!
//! | Shape | Outcome |
//! |-------|---------|
//! | primitive, literal, enum | accepted |
//! | record | every field is checked; untyped fields are rejected |
//! | sequence, set | element type is checked |
//! | 2-tuple with exactly one null member | both members are checked |
//! | any other tuple | [`StructuralViolation::HeterogeneousTuple`] |
//! | mapping | [`StructuralViolation::UnboundedKeySpace`] |
//! | `T \| null` | `T` is checked |
//! | union allow-listed by the [`IndexPolicy`] | accepted without recursion |
//! | any other union | [`StructuralViolation::AmbiguousUnion`] |
//! | anything else | [`StructuralViolation::UnsupportedType`] |
//!
//! The walk is depth-first and fails on the first violation. Records are
//! visited at most once, which also guarantees termination if the record
//! graph ever contains a cycle.
//!
//! This is a static analysis for tests and CI gates. It is never invoked
//! on the runtime construction path.

use std::collections::HashSet;

use thiserror::Error;

use crate::shape::{PrimitiveKind, TypeShape, UnionShape};

/// Name of the numeric union alias.
pub const NUMERIC_UNION: &str = "Numeric";

/// A shape that cannot be mapped onto a static index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralViolation {
    /// A record field has no resolvable type.
    #[error("The field \"{field}\" inside the model \"{record}\" is missing a type annotation! (at {path})")]
    MissingTypeAnnotation {
        /// Dotted path to the field.
        path: String,
        /// Record declaring the field.
        record: String,
        /// Wire name of the field.
        field: String,
    },

    /// A tuple other than a 2-tuple with one null member.
    #[error("Found forbidden tuple \"{shape}\" at {path}. Only 2-tuples with exactly one null alternative can be indexed.")]
    HeterogeneousTuple {
        /// Dotted path to the field.
        path: String,
        /// Rendered tuple type.
        shape: String,
    },

    /// A mapping with caller-defined keys.
    #[error("Found mapping \"{shape}\" at {path}. Caller-defined keys would create an unbounded number of index fields.")]
    UnboundedKeySpace {
        /// Dotted path to the field.
        path: String,
        /// Rendered mapping type.
        shape: String,
    },

    /// A union that is neither optional nor allow-listed.
    #[error("Found forbidden type union: \"{shape}\" at {path}. These would lead to the same JSON keys containing different types of objects.")]
    AmbiguousUnion {
        /// Dotted path to the field.
        path: String,
        /// Rendered union type.
        shape: String,
    },

    /// A shape the validator does not know.
    #[error("The check for \"{shape}\" at {path} is not yet implemented.")]
    UnsupportedType {
        /// Dotted path to the field.
        path: String,
        /// Rendered type.
        shape: String,
    },
}

impl StructuralViolation {
    /// Dotted path to the offending field.
    pub fn path(&self) -> &str {
        match self {
            Self::MissingTypeAnnotation { path, .. }
            | Self::HeterogeneousTuple { path, .. }
            | Self::UnboundedKeySpace { path, .. }
            | Self::AmbiguousUnion { path, .. }
            | Self::UnsupportedType { path, .. } => path,
        }
    }
}

/// A union alias accepted as a single terminal shape.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedUnion {
    /// Alias name the union must carry.
    pub name: &'static str,
    /// Exact members the union must have, in order.
    pub members: Vec<TypeShape>,
}

/// Per-revision configuration of the validator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexPolicy {
    allowed_unions: Vec<AllowedUnion>,
}

impl IndexPolicy {
    /// A policy accepting exactly the given union aliases.
    pub fn new(allowed_unions: Vec<AllowedUnion>) -> Self {
        Self { allowed_unions }
    }

    /// No union other than `T | null` is accepted.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Current revisions: `Numeric = int | float | duration`.
    pub fn current() -> Self {
        Self::new(vec![AllowedUnion {
            name: NUMERIC_UNION,
            members: vec![
                TypeShape::Primitive(PrimitiveKind::Integer),
                TypeShape::Primitive(PrimitiveKind::Float),
                TypeShape::Primitive(PrimitiveKind::Duration),
            ],
        }])
    }

    /// Earlier revisions: `Numeric = int | float | duration | complex`.
    pub fn legacy() -> Self {
        Self::new(vec![AllowedUnion {
            name: NUMERIC_UNION,
            members: vec![
                TypeShape::Primitive(PrimitiveKind::Integer),
                TypeShape::Primitive(PrimitiveKind::Float),
                TypeShape::Primitive(PrimitiveKind::Duration),
                TypeShape::Primitive(PrimitiveKind::Complex),
            ],
        }])
    }

    /// The allow-listed unions.
    pub fn allowed_unions(&self) -> &[AllowedUnion] {
        &self.allowed_unions
    }

    fn allows(&self, union: &UnionShape) -> bool {
        let Some(name) = union.name else {
            return false;
        };
        self.allowed_unions
            .iter()
            .any(|allowed| allowed.name == name && allowed.members == union.members)
    }
}

/// Validator for static indexability.
#[derive(Debug, Clone, Default)]
pub struct StaticIndexValidator {
    policy: IndexPolicy,
}

impl StaticIndexValidator {
    /// Create a validator with the given policy.
    pub fn new(policy: IndexPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    pub fn policy(&self) -> &IndexPolicy {
        &self.policy
    }

    /// Validate `shape` and everything reachable from it.
    ///
    /// # Errors
    ///
    /// Returns the first [`StructuralViolation`] found by the depth-first
    /// walk.
    pub fn validate(&self, shape: &TypeShape) -> Result<(), StructuralViolation> {
        let mut walk = Walk {
            policy: &self.policy,
            visited: HashSet::new(),
        };
        let result = walk.check(shape, &shape.to_string());
        match &result {
            Ok(()) => tracing::debug!(
                root = %shape,
                records = walk.visited.len(),
                "shape is statically indexable"
            ),
            Err(violation) => tracing::debug!(root = %shape, %violation, "shape rejected"),
        }
        result
    }
}

struct Walk<'p> {
    policy: &'p IndexPolicy,
    visited: HashSet<&'static str>,
}

impl Walk<'_> {
    fn check(&mut self, shape: &TypeShape, path: &str) -> Result<(), StructuralViolation> {
        match shape {
            TypeShape::Primitive(_) | TypeShape::Literal(_) | TypeShape::Enum(_) => Ok(()),

            TypeShape::Record(record) => {
                if !self.visited.insert(record.name) {
                    return Ok(());
                }
                for field in record.fields() {
                    let field_path = format!("{path}.{}", field.name);
                    let Some(field_shape) = &field.shape else {
                        return Err(StructuralViolation::MissingTypeAnnotation {
                            path: field_path,
                            record: record.name.to_string(),
                            field: field.name.to_string(),
                        });
                    };
                    self.check(field_shape, &field_path)?;
                }
                Ok(())
            }

            TypeShape::Sequence(inner) | TypeShape::Set(inner) => {
                self.check(inner, &format!("{path}[]"))
            }

            TypeShape::Tuple(items) => {
                let nulls = items.iter().filter(|item| item.is_null()).count();
                if items.len() != 2 || nulls != 1 {
                    return Err(StructuralViolation::HeterogeneousTuple {
                        path: path.to_string(),
                        shape: shape.to_string(),
                    });
                }
                for item in items {
                    self.check(item, path)?;
                }
                Ok(())
            }

            TypeShape::Map { .. } => Err(StructuralViolation::UnboundedKeySpace {
                path: path.to_string(),
                shape: shape.to_string(),
            }),

            TypeShape::Union(union) => {
                if let Some(inner) = union.optional_inner() {
                    return self.check(inner, path);
                }
                if self.policy.allows(union) {
                    return Ok(());
                }
                Err(StructuralViolation::AmbiguousUnion {
                    path: path.to_string(),
                    shape: shape.to_string(),
                })
            }

            TypeShape::Opaque(_) => Err(StructuralViolation::UnsupportedType {
                path: path.to_string(),
                shape: shape.to_string(),
            }),
        }
    }
}
