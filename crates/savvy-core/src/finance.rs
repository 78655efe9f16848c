//! Household budget aggregation.
//!
//! Totals are computed for the calendar month containing `today`, which is
//! always passed in by the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, EventKind, days_in_month};
use crate::types::{EntryId, GoalId, Money, Progress, ValidationError};

/// Direction of a budget entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Income => "income",
            Self::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EntryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(ValidationError::UnknownVariant {
                kind: "entry kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Money that actually came in or went out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Something the family is saving towards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: GoalId,
    pub name: String,
    pub target: Money,
    #[serde(default)]
    pub saved: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl SavingsGoal {
    /// Progress towards the target in cents, capped at the target.
    ///
    /// A zero target reports no progress at all.
    pub fn progress(&self) -> Progress {
        let target = cents_as_usize(self.target);
        if target == 0 {
            return Progress::NONE;
        }
        Progress::new(cents_as_usize(self.saved), target)
    }

    /// Share of the target saved so far, capped at 100. Zero for a zero target.
    pub fn percentage(&self) -> u8 {
        self.progress().percentage
    }

    /// Amount still needed; zero once the target is reached.
    pub fn remaining(&self) -> Money {
        let left = self.target - self.saved;
        if left.is_negative() { Money::ZERO } else { left }
    }

    pub fn deposit(&mut self, amount: Money) {
        self.saved += amount;
    }
}

/// Totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub income: Money,
    pub expenses: Money,
    /// `income - expenses`.
    pub balance: Money,
    /// Payments still scheduled between today and month end.
    pub planned: Money,
    /// `balance - planned`.
    pub available: Money,
    /// Expenses per category, largest first.
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
}

/// Summarizes the month containing `today`.
///
/// Recurring payment events are expanded day by day from `today` through the
/// last day of the month; events without an amount are ignored.
pub fn summarize(
    entries: &[BudgetEntry],
    events: &[CalendarEvent],
    today: NaiveDate,
) -> BudgetSummary {
    summarize_month(entries, events, today, today)
}

/// Summarizes the month containing `month`, as seen on `today`.
///
/// Only payments on or after `today` count as planned: a past month has
/// nothing planned and a future month has its whole span planned.
pub fn summarize_month(
    entries: &[BudgetEntry],
    events: &[CalendarEvent],
    month: NaiveDate,
    today: NaiveDate,
) -> BudgetSummary {
    let month_start = month.with_day(1).unwrap_or(month);
    let month_end = month
        .with_day(days_in_month(month.year(), month.month()))
        .unwrap_or(month);
    let in_month = |date: NaiveDate| date >= month_start && date <= month_end;

    let mut income = Money::ZERO;
    let mut expenses = Money::ZERO;
    let mut categories: BTreeMap<&str, Money> = BTreeMap::new();
    for entry in entries.iter().filter(|e| in_month(e.date)) {
        match entry.kind {
            EntryKind::Income => income += entry.amount,
            EntryKind::Expense => {
                expenses += entry.amount;
                *categories.entry(entry.category.as_str()).or_default() += entry.amount;
            }
        }
    }

    let planned = planned_payments(events, today.max(month_start), month_end);
    let balance = income - expenses;

    let mut by_category: Vec<CategoryTotal> = categories
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    // BTreeMap order already breaks ties by name.
    by_category.sort_by(|a, b| b.amount.cmp(&a.amount));

    BudgetSummary {
        month_start,
        month_end,
        income,
        expenses,
        balance,
        planned,
        available: balance - planned,
        by_category,
    }
}

fn cents_as_usize(amount: Money) -> usize {
    usize::try_from(amount.cents().max(0)).unwrap_or(usize::MAX)
}

/// Sum of payment amounts occurring on each day in `from..=until`.
///
/// Empty when `from` is after `until`.
pub fn planned_payments(events: &[CalendarEvent], from: NaiveDate, until: NaiveDate) -> Money {
    let payments: Vec<(&CalendarEvent, Money)> = events
        .iter()
        .filter(|e| e.kind == EventKind::Payment)
        .filter_map(|e| e.amount.map(|amount| (e, amount)))
        .collect();
    if payments.is_empty() {
        return Money::ZERO;
    }

    from.iter_days()
        .take_while(|day| *day <= until)
        .flat_map(|day| {
            payments
                .iter()
                .filter(move |(e, _)| e.occurs_on(day))
                .map(|(_, amount)| *amount)
        })
        .sum()
}
