//! The `Numeric` union: the one multi-type union the v0 catalog allows.
//!
//! On the wire a numeric value is a JSON integer, a JSON float or an
//! ISO 8601 duration string. Deserialization tries the alternatives in
//! that order, so `3` is an integer, `3.0` is a float and `"PT3S"` is a
//! duration.

use edp_core::Duration;
use serde::{Deserialize, Serialize};

use crate::index::NUMERIC_UNION;
use crate::shape::{Describe, TypeShape};

/// A statistic that is an integer, a float or a time span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    /// Integral value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Time span, e.g. the spread of a date-time column.
    Duration(Duration),
}

impl Numeric {
    /// The value as a float. Durations convert to seconds.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Integer(i) => *i as f64,
            Self::Float(f) => *f,
            Self::Duration(d) => {
                let delta = d.as_time_delta();
                delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
            }
        }
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Duration> for Numeric {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

impl Describe for Numeric {
    fn shape() -> TypeShape {
        TypeShape::named_union(
            NUMERIC_UNION,
            vec![i64::shape(), f64::shape(), Duration::shape()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexPolicy, StaticIndexValidator};
    use serde_json::json;

    #[test]
    fn test_alternatives_are_tried_in_order() {
        assert_eq!(serde_json::from_value::<Numeric>(json!(3)).unwrap(), Numeric::Integer(3));
        assert_eq!(serde_json::from_value::<Numeric>(json!(3.5)).unwrap(), Numeric::Float(3.5));
        assert_eq!(
            serde_json::from_value::<Numeric>(json!("PT1M30S")).unwrap(),
            Numeric::Duration(Duration::from_secs(90).unwrap())
        );
        assert!(serde_json::from_value::<Numeric>(json!("three")).is_err());
        assert!(serde_json::from_value::<Numeric>(json!(null)).is_err());
    }

    #[test]
    fn test_serializes_untagged() {
        assert_eq!(serde_json::to_value(Numeric::from(7_i64)).unwrap(), json!(7));
        assert_eq!(serde_json::to_value(Numeric::from(0.25)).unwrap(), json!(0.25));
        let d = Numeric::from(Duration::from_secs(86_400).unwrap());
        assert_eq!(serde_json::to_value(d).unwrap(), json!("P1D"));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Numeric::Integer(2).as_f64(), 2.0);
        assert_eq!(Numeric::from(Duration::from_secs_f64(1.5).unwrap()).as_f64(), 1.5);
    }

    #[test]
    fn test_shape_matches_current_policy() {
        StaticIndexValidator::new(IndexPolicy::current())
            .validate(&Numeric::shape())
            .unwrap();
        assert_eq!(Numeric::shape().to_string(), "Numeric");
    }
}
