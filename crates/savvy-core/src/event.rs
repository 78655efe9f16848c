//! Calendar events and recurrence day-matching.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{EventId, Money, ValidationError};

/// A planned item on the family calendar.
///
/// Times are kept as the loosely-typed strings the app stores; the layout
/// engine normalizes them before any arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Unique identifier for this event.
    pub id: EventId,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Day the event is anchored to.
    pub date: NaiveDate,
    /// Start time as `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// End time as `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Shown in the all-day lane instead of the timed grid.
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default, rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CalendarEvent {
    /// Creates a one-off reminder with no times set.
    pub fn new(id: EventId, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            title: title.into(),
            date,
            time: None,
            end_time: None,
            all_day: false,
            recurrence: Recurrence::None,
            kind: EventKind::Reminder,
            color: None,
            amount: None,
            note: None,
        }
    }

    /// Whether this event appears on `date`, expanding its recurrence.
    ///
    /// Recurring events never appear before their anchor date. Monthly events
    /// anchored on the 29th-31st fall on the last day of shorter months.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        if date < self.date {
            return false;
        }
        match self.recurrence {
            Recurrence::None => date == self.date,
            Recurrence::Daily => true,
            Recurrence::Weekly => date.weekday() == self.date.weekday(),
            Recurrence::Monthly => {
                let last = days_in_month(date.year(), date.month());
                date.day() == self.date.day().min(last)
            }
        }
    }
}

/// Events from `events` that appear on `date`, in input order.
pub fn events_on(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| e.occurs_on(date)).collect()
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

/// How an event repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ValidationError::UnknownVariant {
                kind: "recurrence",
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for Recurrence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Recurrence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// What an event represents. Only budgeting reads this; layout ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A planned outgoing payment (bill, purchase).
    Payment,
    /// Expected money in (salary, allowance).
    Income,
    #[default]
    Reminder,
    /// Anything the app does not recognize.
    #[serde(other)]
    Other,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Payment => "payment",
            Self::Income => "income",
            Self::Reminder => "reminder",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" | "expense" | "bill" => Ok(Self::Payment),
            "income" => Ok(Self::Income),
            "reminder" => Ok(Self::Reminder),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::UnknownVariant {
                kind: "event type",
                value: s.to_string(),
            }),
        }
    }
}
