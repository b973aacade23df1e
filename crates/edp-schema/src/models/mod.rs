//! # Field Catalog
//!
//! One submodule per published schema revision. Each revision is a closed
//! set of records and enumerations that serialize with `serde` and
//! describe themselves through [`Describe`](crate::shape::Describe).
//!
//! The helpers in this module are shared by all revisions: the
//! `string_enum!` and `describe_record!` macros, and the field-level
//! deserializers that enforce numeric bounds and required-but-nullable
//! fields.

use edp_core::ValidationError;
use serde::{Deserialize, Deserializer};

/// Declare a closed string enumeration with its wire values.
///
/// Generates the enum with `serde` renames, `ALL`, `as_str()`,
/// `Display`, `FromStr` and a [`Describe`](crate::shape::Describe)
/// implementation. The description string doubles as the type's doc
/// comment.
macro_rules! string_enum {
    (
        $name:ident ($description:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        #[doc = $description]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire value of the variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = edp_core::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(edp_core::ValidationError::UnknownVariant {
                        type_name: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl $crate::shape::Describe for $name {
            fn shape() -> $crate::shape::TypeShape {
                $crate::shape::TypeShape::Enum($crate::shape::EnumShape {
                    name: stringify!($name),
                    description: $description,
                    values: &[$($wire),+],
                })
            }
        }
    };
}

/// Implement [`Describe`](crate::shape::Describe) for a record.
///
/// Field shapes are listed in wire order using the wire names.
macro_rules! describe_record {
    ($name:ident, $description:literal, [ $($field:expr),* $(,)? ]) => {
        impl $crate::shape::Describe for $name {
            fn shape() -> $crate::shape::TypeShape {
                $crate::shape::TypeShape::Record($crate::shape::RecordShape::new(
                    stringify!($name),
                    $description,
                    || vec![$($field),*],
                ))
            }
        }
    };
}

/// Generate a field deserializer that enforces an inclusive range.
///
/// Works for `f64`, `i64` and their `Option` forms. For `Option` forms
/// the field must be present on the wire; `null` skips the check.
macro_rules! range_deserializer {
    ($fn_name:ident: $ty:ty, $field:literal, $min:expr, $max:expr) => {
        fn $fn_name<'de, D>(deserializer: D) -> Result<$ty, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let value = <$ty as serde::Deserialize>::deserialize(deserializer)?;
            $crate::models::InRange::check_range(&value, $field, $min, $max)
                .map_err(serde::de::Error::custom)?;
            Ok(value)
        }
    };
}

pub mod v0;

/// Numeric values that can be checked against an inclusive range.
pub(crate) trait InRange {
    fn check_range(&self, field: &'static str, minimum: f64, maximum: f64)
        -> Result<(), ValidationError>;
}

impl InRange for f64 {
    fn check_range(
        &self,
        field: &'static str,
        minimum: f64,
        maximum: f64,
    ) -> Result<(), ValidationError> {
        // NaN fails both comparisons, so test for containment.
        if (minimum..=maximum).contains(self) {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field,
                value: *self,
                minimum,
                maximum,
            })
        }
    }
}

impl InRange for i64 {
    fn check_range(
        &self,
        field: &'static str,
        minimum: f64,
        maximum: f64,
    ) -> Result<(), ValidationError> {
        (*self as f64).check_range(field, minimum, maximum)
    }
}

impl<T: InRange> InRange for Option<T> {
    fn check_range(
        &self,
        field: &'static str,
        minimum: f64,
        maximum: f64,
    ) -> Result<(), ValidationError> {
        match self {
            Some(value) => value.check_range(field, minimum, maximum),
            None => Ok(()),
        }
    }
}

/// Deserialize an `Option<T>` that must be present on the wire.
///
/// `serde` treats a missing `Option` field as `None`. Routing the field
/// through `deserialize_with` disables that, so absence is an error while
/// an explicit `null` is still accepted.
pub(crate) fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}
