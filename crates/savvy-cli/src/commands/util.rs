//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Days, NaiveDate};
use regex::Regex;

/// Relative day offsets such as `in 3 days`.
static RELATIVE_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^in\s+(\d+)\s+days?$").unwrap());

/// Upper bound on relative offsets (~100 years).
const MAX_RELATIVE_DAYS: u64 = 100 * 366;

/// Parse a calendar date relative to `today`.
///
/// Supports:
/// - ISO 8601: "2026-03-10"
/// - Keywords: "today", "tomorrow", "yesterday"
/// - Relative: "in 3 days"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    match s {
        "today" => return Ok(today),
        "tomorrow" => return today.succ_opt().context("date out of range"),
        "yesterday" => return today.pred_opt().context("date out of range"),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = RELATIVE_DAY_RE.captures(s) else {
        anyhow::bail!("Invalid date: {s}. Use YYYY-MM-DD, today, tomorrow or 'in N days'");
    };
    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    if n > MAX_RELATIVE_DAYS {
        anyhow::bail!("Relative date too far ahead: {n} days");
    }
    today
        .checked_add_days(Days::new(n))
        .context("date out of range")
}

/// Parse an optional date argument, defaulting to `today`.
pub fn date_or_today(s: Option<&str>, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    s.map_or(Ok(today), |s| parse_date(s, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("tomorrow", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()
        );
        assert_eq!(
            parse_date("yesterday", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
        );
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_date("2026-12-24", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 24).unwrap()
        );
    }

    #[test]
    fn test_parse_relative_days() {
        assert_eq!(
            parse_date("in 1 day", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()
        );
        assert_eq!(
            parse_date("in 30 days", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 9).unwrap()
        );
    }

    #[test]
    fn test_parse_invalid_date() {
        let err = parse_date("next friday", today()).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
        assert!(parse_date("2026-02-30", today()).is_err());
    }

    #[test]
    fn test_relative_date_bounds() {
        let err = parse_date("in 999999 days", today()).unwrap_err();
        assert!(err.to_string().contains("too far ahead"));
    }

    #[test]
    fn test_date_or_today_defaults() {
        assert_eq!(date_or_today(None, today()).unwrap(), today());
    }
}
