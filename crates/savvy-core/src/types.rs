//! Core type definitions with validation.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Strict `HH:MM` with a 24-hour clock.
static CLOCK_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").unwrap());

/// Decimal amount with at most two fractional digits.
static MONEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-)?(\d+)(?:\.(\d{1,2}))?$").unwrap());

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Not a valid `HH:MM` clock time.
    #[error("invalid time of day: {value} (expected HH:MM)")]
    InvalidClockTime { value: String },

    /// Not a valid decimal money amount.
    #[error("invalid amount: {value}")]
    InvalidAmount { value: String },

    /// Unknown enum label.
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        // Hash and Eq delegate to the inner String, so lookups by &str are consistent.
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated calendar event identifier.
    EventId, "event ID"
);

define_string_id!(
    /// A validated lesson identifier.
    ///
    /// Lesson IDs are stable across releases; completed-lesson records refer to them.
    LessonId, "lesson ID"
);

define_string_id!(
    /// A validated course module identifier.
    ModuleId, "module ID"
);

define_string_id!(
    /// A validated budget entry identifier.
    EntryId, "entry ID"
);

define_string_id!(
    /// A validated savings goal identifier.
    GoalId, "goal ID"
);

impl LessonId {
    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }
}

impl ModuleId {
    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }
}

/// A time of day in whole minutes since midnight, `00:00` through `23:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Parses a strict `HH:MM` string.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidClockTime {
            value: value.to_string(),
        };
        let caps = CLOCK_TIME_RE.captures(value).ok_or_else(invalid)?;
        let hours: u16 = caps[1].parse().map_err(|_| invalid())?;
        let minutes: u16 = caps[2].parse().map_err(|_| invalid())?;
        Ok(Self(hours * 60 + minutes))
    }

    /// Builds a clock time from minutes since midnight, wrapping past 24h.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "value is reduced modulo 1440 first"
        )]
        let wrapped = (minutes % MINUTES_PER_DAY) as u16;
        Self(wrapped)
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0 as u32
    }

    /// Adds minutes, wrapping around midnight.
    #[must_use]
    pub const fn add_minutes(self, minutes: u32) -> Self {
        Self::from_minutes(self.minutes() + minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A money amount in minor units (cents).
///
/// Serialized as a plain integer number of cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// True when the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    /// Parses `12`, `12.5`, `12.50` or `-3.25`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidAmount {
            value: s.to_string(),
        };
        let caps = MONEY_RE.captures(s.trim()).ok_or_else(invalid)?;
        let whole: i64 = caps[2].parse().map_err(|_| invalid())?;
        let fraction = match caps.get(3).map(|m| m.as_str()) {
            None => 0,
            Some(digits) if digits.len() == 1 => digits.parse::<i64>().map_err(|_| invalid())? * 10,
            Some(digits) => digits.parse::<i64>().map_err(|_| invalid())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(invalid)?;
        Ok(if caps.get(1).is_some() {
            Self(-cents)
        } else {
            Self(cents)
        })
    }
}

/// Completion of a scoped set of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Items completed.
    pub completed: usize,
    /// Items in scope.
    pub total: usize,
    /// `round(100 * completed / total)`, or 0 when nothing is in scope.
    pub percentage: u8,
}

impl Progress {
    /// Empty progress.
    pub const NONE: Self = Self {
        completed: 0,
        total: 0,
        percentage: 0,
    };

    /// Computes progress, clamping `completed` to `total`.
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        let completed = completed.min(total);
        Self {
            completed,
            total,
            percentage: rounded_percentage(completed as u128, total as u128),
        }
    }

    /// True when every item in scope is complete and the scope is non-empty.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// `round(100 * part / whole)` with halves rounded up, clamped to `[0, 100]`.
pub(crate) fn rounded_percentage(part: u128, whole: u128) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole);
    let pct = (200 * part + whole) / (2 * whole);
    u8::try_from(pct).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_rejects_empty() {
        assert!(LessonId::new("").is_err());
        assert!(LessonId::new("   ").is_err());
        assert!(LessonId::new("budget-basics").is_ok());
    }

    #[test]
    fn event_id_serde_rejects_empty() {
        let result: Result<EventId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn lesson_id_serde_roundtrip() {
        let id = LessonId::new("b-1-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"b-1-1\"");
        let parsed: LessonId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn ids_borrow_as_str_for_set_lookups() {
        let mut set = std::collections::HashSet::new();
        set.insert(LessonId::new("b-1-1").unwrap());
        assert!(set.contains("b-1-1"));
        assert!(!set.contains("b-1-2"));
    }

    #[test]
    fn clock_time_parses_strict_hh_mm() {
        assert_eq!(ClockTime::parse("00:00").unwrap().minutes(), 0);
        assert_eq!(ClockTime::parse("09:30").unwrap().minutes(), 570);
        assert_eq!(ClockTime::parse("23:59").unwrap().minutes(), 1439);

        for bad in ["24:00", "9:00", "12:60", "12:5", "", "ab:cd", "12:00 ", "-1:00"] {
            assert!(ClockTime::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn clock_time_add_minutes_wraps_midnight() {
        let late = ClockTime::parse("23:50").unwrap();
        assert_eq!(late.add_minutes(30).to_string(), "00:20");
        assert_eq!(ClockTime::parse("14:00").unwrap().add_minutes(30).to_string(), "14:30");
    }

    #[test]
    fn money_parses_decimal_amounts() {
        assert_eq!("12".parse::<Money>().unwrap().cents(), 1200);
        assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!("12.05".parse::<Money>().unwrap().cents(), 1205);
        assert_eq!("-3.25".parse::<Money>().unwrap().cents(), -325);
        assert!("12.345".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::from_cents(123_456).to_string(), "1234.56");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn progress_rounds_and_clamps() {
        assert_eq!(Progress::new(1, 3).percentage, 33);
        assert_eq!(Progress::new(2, 3).percentage, 67);
        assert_eq!(Progress::new(1, 8).percentage, 13);
        assert_eq!(Progress::new(0, 0), Progress::NONE);
        assert_eq!(Progress::new(5, 3).percentage, 100);
        assert!(Progress::new(3, 3).is_complete());
        assert!(!Progress::new(0, 0).is_complete());
    }
}
