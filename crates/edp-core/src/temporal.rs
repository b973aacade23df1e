//! # Temporal Types — ISO 8601 Durations
//!
//! Defines [`Duration`], the time-span primitive used by dataset
//! statistics (e.g. the spread of a date-time column). On the wire a
//! duration is an ISO 8601 duration string such as `P1DT2H30M` or
//! `PT0.25S`; plain JSON numbers are accepted on input and read as
//! seconds.
//!
//! ## Canonical Form
//!
//! Serialization always emits the normalized form: weeks are folded into
//! days, hours/minutes/seconds are carried, zero components are
//! omitted, and fractional seconds are trimmed of trailing zeros. The
//! zero duration renders as `PT0S`. Parsing the canonical form yields an
//! equal value.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_WEEK: i64 = 604_800;

/// A signed time span with nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(TimeDelta);

impl Duration {
    /// The zero-length duration.
    pub fn zero() -> Self {
        Self(TimeDelta::zero())
    }

    /// Wrap a `chrono::TimeDelta`.
    pub fn from_time_delta(delta: TimeDelta) -> Self {
        Self(delta)
    }

    /// Build a duration from whole seconds.
    pub fn from_secs(secs: i64) -> Option<Self> {
        TimeDelta::try_seconds(secs).map(Self)
    }

    /// Build a duration from fractional seconds.
    ///
    /// Returns `None` for non-finite or out-of-range inputs.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() || secs.abs() >= i64::MAX as f64 {
            return None;
        }
        let whole = secs.trunc();
        let nanos = ((secs - whole).abs() * 1e9).round() as u32;
        let delta = TimeDelta::new(whole.abs() as i64, nanos.min(999_999_999))?;
        Some(Self(if secs < 0.0 { -delta } else { delta }))
    }

    /// Access the inner `TimeDelta`.
    pub fn as_time_delta(&self) -> &TimeDelta {
        &self.0
    }

    /// Whole seconds, truncated toward zero.
    pub fn num_seconds(&self) -> i64 {
        self.0.num_seconds()
    }

    /// Parse an ISO 8601 duration (`[-]P[nW][nD][T[nH][nM][n[.f]S]]`).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDuration`] for malformed input,
    /// fractional values on units other than seconds, or overflow.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDuration(input.to_string());

        let (negative, rest) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input.strip_prefix('+').unwrap_or(input)),
        };
        let rest = rest.strip_prefix('P').ok_or_else(invalid)?;
        if rest.is_empty() {
            return Err(invalid());
        }

        let (date_part, time_part) = match rest.split_once('T') {
            Some((_, "")) => return Err(invalid()),
            Some((date, time)) => (date, Some(time)),
            None => (rest, None),
        };

        let mut secs: i64 = 0;
        let mut nanos: u32 = 0;

        for (value, unit) in designators(date_part).ok_or_else(invalid)? {
            let factor = match unit {
                'W' => SECONDS_PER_WEEK,
                'D' => SECONDS_PER_DAY,
                _ => return Err(invalid()),
            };
            secs = accumulate(secs, value, factor).ok_or_else(invalid)?;
        }

        if let Some(time) = time_part {
            for (value, unit) in designators(time).ok_or_else(invalid)? {
                match unit {
                    'H' => secs = accumulate(secs, value, SECONDS_PER_HOUR).ok_or_else(invalid)?,
                    'M' => secs = accumulate(secs, value, SECONDS_PER_MINUTE).ok_or_else(invalid)?,
                    'S' => {
                        let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
                        secs = accumulate(secs, whole, 1).ok_or_else(invalid)?;
                        nanos = parse_fraction(fraction).ok_or_else(invalid)?;
                    }
                    _ => return Err(invalid()),
                }
            }
        }

        let delta = TimeDelta::new(secs, nanos).ok_or_else(invalid)?;
        Ok(Self(if negative { -delta } else { delta }))
    }
}

/// Split `12H30M` into `[("12", 'H'), ("30", 'M')]`.
fn designators(s: &str) -> Option<Vec<(&str, char)>> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_uppercase() {
            let value = &s[start..i];
            if value.is_empty() {
                return None;
            }
            out.push((value, c));
            start = i + 1;
        } else if !(c.is_ascii_digit() || c == '.') {
            return None;
        }
    }
    (start == s.len()).then_some(out)
}

fn accumulate(total: i64, value: &str, factor: i64) -> Option<i64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: i64 = value.parse().ok()?;
    n.checked_mul(factor).and_then(|v| total.checked_add(v))
}

fn parse_fraction(fraction: &str) -> Option<u32> {
    if fraction.is_empty() {
        return Some(0);
    }
    if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{fraction:0<9}");
    padded.parse().ok()
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut delta = self.0;
        if delta < TimeDelta::zero() {
            f.write_str("-")?;
            delta = -delta;
        }

        let total = delta.num_seconds();
        let nanos = delta.subsec_nanos();
        let days = total / SECONDS_PER_DAY;
        let rem = total % SECONDS_PER_DAY;
        let hours = rem / SECONDS_PER_HOUR;
        let minutes = rem % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;
        let seconds = rem % SECONDS_PER_MINUTE;

        f.write_str("P")?;
        if days > 0 {
            write!(f, "{days}D")?;
        }
        if rem == 0 && nanos == 0 && days > 0 {
            return Ok(());
        }

        f.write_str("T")?;
        if hours > 0 {
            write!(f, "{hours}H")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}M")?;
        }
        if seconds > 0 || nanos > 0 || (hours == 0 && minutes == 0) {
            write!(f, "{seconds}")?;
            if nanos > 0 {
                let fraction = format!("{nanos:09}");
                write!(f, ".{}", fraction.trim_end_matches('0'))?;
            }
            f.write_str("S")?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TimeDelta> for Duration {
    fn from(delta: TimeDelta) -> Self {
        Self(delta)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct DurationVisitor;

impl<'de> Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an ISO 8601 duration string or a number of seconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        Duration::parse(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
        Duration::from_secs(v)
            .ok_or_else(|| E::custom(format!("duration of {v} seconds is out of range")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
        i64::try_from(v)
            .ok()
            .and_then(Duration::from_secs)
            .ok_or_else(|| E::custom(format!("duration of {v} seconds is out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Duration, E> {
        Duration::from_secs_f64(v)
            .ok_or_else(|| E::custom(format!("duration of {v} seconds is out of range")))
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: i64) -> Duration {
        Duration::from_secs(n).unwrap()
    }

    #[test]
    fn test_display_canonical_forms() {
        assert_eq!(Duration::zero().to_string(), "PT0S");
        assert_eq!(secs(90).to_string(), "PT1M30S");
        assert_eq!(secs(86_400).to_string(), "P1D");
        assert_eq!(secs(86_400 + 3_600).to_string(), "P1DT1H");
        assert_eq!(secs(-5).to_string(), "-PT5S");
        assert_eq!(Duration::from_secs_f64(1.25).unwrap().to_string(), "PT1.25S");
    }

    #[test]
    fn test_parse_components() {
        assert_eq!(Duration::parse("P1W").unwrap(), secs(604_800));
        assert_eq!(
            Duration::parse("P2DT3H4M5S").unwrap(),
            secs(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5)
        );
        assert_eq!(Duration::parse("PT0.5S").unwrap(), Duration::from_secs_f64(0.5).unwrap());
        assert_eq!(Duration::parse("-PT1M").unwrap(), secs(-60));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "", "P", "PT", "1D", "P1.5D", "PT1.5M", "P1Y", "PTS", "P1DT", "PT1S2", "PT1.1234567891S",
        ] {
            assert!(
                matches!(Duration::parse(input), Err(ValidationError::InvalidDuration(_))),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_display_parse_roundtrip() {
        for d in [
            Duration::zero(),
            secs(1),
            secs(3_599),
            secs(123_456_789),
            secs(-86_401),
            Duration::from_secs_f64(12.000_000_001).unwrap(),
        ] {
            assert_eq!(Duration::parse(&d.to_string()).unwrap(), d, "roundtrip of {d}");
        }
    }

    #[test]
    fn test_deserialize_string_and_number() {
        let from_str: Duration = serde_json::from_str("\"PT2S\"").unwrap();
        let from_int: Duration = serde_json::from_str("2").unwrap();
        let from_float: Duration = serde_json::from_str("2.0").unwrap();
        assert_eq!(from_str, secs(2));
        assert_eq!(from_int, secs(2));
        assert_eq!(from_float, secs(2));
        assert_eq!(serde_json::to_string(&secs(2)).unwrap(), "\"PT2S\"");
    }

    #[test]
    fn test_non_finite_seconds_rejected() {
        assert!(Duration::from_secs_f64(f64::NAN).is_none());
        assert!(Duration::from_secs_f64(f64::INFINITY).is_none());
    }
}
