//! # Type-Shape Descriptors
//!
//! A first-class description of the static type of every schema field.
//! The field catalog implements [`Describe`] for each of its types, and
//! both the static indexability validator ([`crate::index`]) and the
//! JSON Schema exporter ([`crate::export`]) walk the resulting
//! [`TypeShape`] tree. Neither relies on runtime reflection.
//!
//! ## Records Are Lazy
//!
//! A [`RecordShape`] holds a function producing its fields rather than
//! the fields themselves. Building a shape therefore never recurses, and
//! a record graph containing a reference cycle is representable. Walkers
//! are responsible for tracking visited records.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use edp_core::{Duration, FileReference, JsonReference, Language, Version};
use serde_json::Value;

/// Leaf types that are terminal for every walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// JSON `null`.
    Null,
    /// UTF-8 string.
    String,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Float,
    /// Complex number (only in earlier schema revisions).
    Complex,
    /// Boolean.
    Boolean,
    /// RFC 3339 date-time.
    DateTime,
    /// ISO 8601 duration.
    Duration,
    /// POSIX file path.
    Path,
    /// Absolute URL.
    Url,
    /// RFC 4122 UUID.
    Uuid,
    /// Semantic version string.
    Version,
    /// ISO 639-3 language code.
    Language,
}

impl PrimitiveKind {
    /// Short name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String => "str",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Complex => "complex",
            Self::Boolean => "bool",
            Self::DateTime => "datetime",
            Self::Duration => "duration",
            Self::Path => "path",
            Self::Url => "url",
            Self::Uuid => "uuid",
            Self::Version => "version",
            Self::Language => "language",
        }
    }
}

/// A closed set of string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumShape {
    /// Type name, used as the `$defs` key on export.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Wire values, in declaration order.
    pub values: &'static [&'static str],
}

/// A named record with lazily produced fields.
#[derive(Clone, Copy)]
pub struct RecordShape {
    /// Type name, used as the `$defs` key on export and as the
    /// identity for cycle detection.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    fields: fn() -> Vec<FieldShape>,
}

impl RecordShape {
    /// Declare a record.
    pub const fn new(
        name: &'static str,
        description: &'static str,
        fields: fn() -> Vec<FieldShape>,
    ) -> Self {
        Self {
            name,
            description,
            fields,
        }
    }

    /// Produce the record's fields.
    pub fn fields(&self) -> Vec<FieldShape> {
        (self.fields)()
    }
}

// Records are identified by name; comparing the field functions would be
// unreliable across codegen units.
impl PartialEq for RecordShape {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordShape").field("name", &self.name).finish()
    }
}

/// A union of alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionShape {
    /// Name of a pre-declared union alias (e.g. `Numeric`), `None` for
    /// anonymous unions such as `Option<T>`.
    pub name: Option<&'static str>,
    /// Alternatives, in declaration order.
    pub members: Vec<TypeShape>,
}

impl UnionShape {
    /// The non-null member of a two-member union with exactly one null
    /// alternative.
    pub fn optional_inner(&self) -> Option<&TypeShape> {
        match self.members.as_slice() {
            [a, b] if a.is_null() && !b.is_null() => Some(b),
            [a, b] if b.is_null() && !a.is_null() => Some(a),
            _ => None,
        }
    }
}

/// The static shape of a type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// Terminal leaf type.
    Primitive(PrimitiveKind),
    /// A fixed set of literal values.
    Literal(Vec<Value>),
    /// A closed string enumeration.
    Enum(EnumShape),
    /// A record with named fields.
    Record(RecordShape),
    /// Homogeneous ordered sequence.
    Sequence(Box<TypeShape>),
    /// Homogeneous set.
    Set(Box<TypeShape>),
    /// Fixed-arity tuple.
    Tuple(Vec<TypeShape>),
    /// Mapping with caller-defined keys.
    Map {
        /// Key type.
        key: Box<TypeShape>,
        /// Value type.
        value: Box<TypeShape>,
    },
    /// Union of alternatives.
    Union(UnionShape),
    /// A shape no walker knows how to handle.
    Opaque(&'static str),
}

impl TypeShape {
    /// Shorthand for a primitive shape.
    pub const fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }

    /// `T | null`.
    pub fn optional(inner: TypeShape) -> Self {
        Self::Union(UnionShape {
            name: None,
            members: vec![inner, Self::Primitive(PrimitiveKind::Null)],
        })
    }

    /// A named union alias.
    pub fn named_union(name: &'static str, members: Vec<TypeShape>) -> Self {
        Self::Union(UnionShape {
            name: Some(name),
            members,
        })
    }

    /// Whether this is the null primitive.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveKind::Null))
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[TypeShape]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Self::Primitive(kind) => f.write_str(kind.as_str()),
            Self::Literal(values) => {
                f.write_str("Literal[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Self::Enum(e) => f.write_str(e.name),
            Self::Record(r) => f.write_str(r.name),
            Self::Sequence(inner) => write!(f, "list[{inner}]"),
            Self::Set(inner) => write!(f, "set[{inner}]"),
            Self::Tuple(items) => {
                f.write_str("tuple[")?;
                join(f, items)?;
                f.write_str("]")
            }
            Self::Map { key, value } => write!(f, "dict[{key}, {value}]"),
            Self::Union(u) => {
                if let Some(name) = u.name {
                    return f.write_str(name);
                }
                f.write_str("Union[")?;
                join(f, &u.members)?;
                f.write_str("]")
            }
            Self::Opaque(name) => f.write_str(name),
        }
    }
}

/// A single record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    /// Wire (external) name of the field.
    pub name: &'static str,
    /// Declared type; `None` when the field carries no type annotation.
    pub shape: Option<TypeShape>,
    /// Whether the field must be present on the wire.
    pub required: bool,
    /// Human-readable description.
    pub description: &'static str,
    /// Default value when the field is absent.
    pub default: Option<Value>,
    /// Inclusive lower bound for numbers.
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numbers.
    pub maximum: Option<f64>,
    /// Minimum number of items for sequences.
    pub min_items: Option<usize>,
    /// Regular expression strings must fully match.
    pub pattern: Option<&'static str>,
}

impl FieldShape {
    fn new(
        name: &'static str,
        shape: Option<TypeShape>,
        required: bool,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            shape,
            required,
            description,
            default: None,
            minimum: None,
            maximum: None,
            min_items: None,
            pattern: None,
        }
    }

    /// A field that must be present.
    pub fn required(name: &'static str, shape: TypeShape, description: &'static str) -> Self {
        Self::new(name, Some(shape), true, description)
    }

    /// A field that may be omitted and then takes `default`.
    pub fn defaulted(
        name: &'static str,
        shape: TypeShape,
        default: Value,
        description: &'static str,
    ) -> Self {
        let mut field = Self::new(name, Some(shape), false, description);
        field.default = Some(default);
        field
    }

    /// A field whose type could not be resolved.
    pub fn untyped(name: &'static str, description: &'static str) -> Self {
        Self::new(name, None, true, description)
    }

    /// Restrict a number to `[minimum, maximum]`.
    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Restrict a number to `>= minimum`.
    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Require at least `n` items.
    pub fn with_min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    /// Require strings to match `pattern`.
    pub fn with_pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

/// Types that can describe their static shape.
pub trait Describe {
    /// The shape of `Self`.
    fn shape() -> TypeShape;
}

/// Required field of type `T`.
pub fn field<T: Describe>(name: &'static str, description: &'static str) -> FieldShape {
    FieldShape::required(name, T::shape(), description)
}

/// Field of type `T` that defaults to `null` when absent.
pub fn nullable_field<T: Describe>(name: &'static str, description: &'static str) -> FieldShape {
    FieldShape::defaulted(name, T::shape(), Value::Null, description)
}

/// Field of type `T` that defaults to `[]` when absent.
pub fn list_field<T: Describe>(name: &'static str, description: &'static str) -> FieldShape {
    FieldShape::defaulted(name, T::shape(), Value::Array(Vec::new()), description)
}

macro_rules! describe_primitive {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> TypeShape {
                    TypeShape::Primitive(PrimitiveKind::$kind)
                }
            }
        )+
    };
}

describe_primitive!(Null => ());
describe_primitive!(String => String, str);
describe_primitive!(Integer => i8, i16, i32, i64, u8, u16, u32, u64, usize);
describe_primitive!(Float => f32, f64);
describe_primitive!(Boolean => bool);
describe_primitive!(DateTime => DateTime<Utc>);
describe_primitive!(Duration => Duration);
describe_primitive!(Path => FileReference);
describe_primitive!(Url => url::Url);
describe_primitive!(Uuid => uuid::Uuid);
describe_primitive!(Version => Version);
describe_primitive!(Language => Language);

impl<T: Describe> Describe for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::optional(T::shape())
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::Sequence(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn shape() -> TypeShape {
        TypeShape::Set(Box::new(T::shape()))
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn shape() -> TypeShape {
        TypeShape::Set(Box::new(T::shape()))
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> TypeShape {
        TypeShape::Map {
            key: Box::new(K::shape()),
            value: Box::new(V::shape()),
        }
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn shape() -> TypeShape {
        TypeShape::Map {
            key: Box::new(K::shape()),
            value: Box::new(V::shape()),
        }
    }
}

impl<A: Describe, B: Describe> Describe for (A, B) {
    fn shape() -> TypeShape {
        TypeShape::Tuple(vec![A::shape(), B::shape()])
    }
}

impl<A: Describe, B: Describe, C: Describe> Describe for (A, B, C) {
    fn shape() -> TypeShape {
        TypeShape::Tuple(vec![A::shape(), B::shape(), C::shape()])
    }
}

impl<T: Describe> Describe for Box<T> {
    fn shape() -> TypeShape {
        T::shape()
    }
}

impl Describe for serde_json::Value {
    fn shape() -> TypeShape {
        TypeShape::Opaque("Any")
    }
}

/// Pattern every [`JsonReference`] must fully match.
pub const JSON_REFERENCE_PATTERN: &str = "^#(/[a-zA-Z0-9_-]+)+$";

impl Describe for JsonReference {
    fn shape() -> TypeShape {
        TypeShape::Record(RecordShape::new(
            "JsonReference",
            "A reference to another field within the same JSON file.",
            || {
                vec![field::<String>("$ref", "The JSON keys that lead to the referred value.")
                    .with_pattern(JSON_REFERENCE_PATTERN)]
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_is_two_member_union_with_null() {
        let TypeShape::Union(u) = Option::<i64>::shape() else {
            panic!("Option should describe a union");
        };
        assert_eq!(u.name, None);
        assert_eq!(u.optional_inner(), Some(&TypeShape::Primitive(PrimitiveKind::Integer)));
    }

    #[test]
    fn test_optional_inner_rejects_non_optional_unions() {
        let both_null = UnionShape {
            name: None,
            members: vec![<()>::shape(), <()>::shape()],
        };
        assert_eq!(both_null.optional_inner(), None);

        let three = UnionShape {
            name: None,
            members: vec![i64::shape(), String::shape(), <()>::shape()],
        };
        assert_eq!(three.optional_inner(), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Vec::<Option<String>>::shape().to_string(), "list[Union[str, null]]");
        assert_eq!(BTreeMap::<String, i64>::shape().to_string(), "dict[str, int]");
        assert_eq!(<(i64, String, bool)>::shape().to_string(), "tuple[int, str, bool]");
        assert_eq!(JsonReference::shape().to_string(), "JsonReference");
    }

    #[test]
    fn test_records_compare_by_name() {
        assert_eq!(JsonReference::shape(), JsonReference::shape());
    }

    #[test]
    fn test_json_reference_record_uses_wire_name() {
        let TypeShape::Record(r) = JsonReference::shape() else {
            panic!("JsonReference should describe a record");
        };
        let fields = r.fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "$ref");
        assert_eq!(fields[0].pattern, Some(JSON_REFERENCE_PATTERN));
    }
}
