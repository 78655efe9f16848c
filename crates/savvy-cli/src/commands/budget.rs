//! Budget commands: record income and expenses, summarize the month.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;

use savvy_core::{BudgetEntry, EntryId, EntryKind, Money, summarize_month};
use savvy_store::{Store, new_record_id};

use super::util::date_or_today;

#[derive(Debug, Args)]
pub struct AddEntryArgs {
    /// income or expense.
    pub kind: EntryKind,

    /// Amount (e.g., 49.90).
    pub amount: Money,

    /// Spending category.
    #[arg(long, default_value = "general")]
    pub category: String,

    /// Day the money moved (defaults to today).
    #[arg(long)]
    pub date: Option<String>,

    /// Free-form note.
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Any day in the month to summarize (defaults to today). Planned
    /// payments only count from today onwards.
    #[arg(long)]
    pub date: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn add<W: Write>(
    writer: &mut W,
    store: &mut Store,
    args: &AddEntryArgs,
    today: NaiveDate,
) -> Result<()> {
    if args.amount <= Money::ZERO {
        bail!("amount must be positive");
    }
    let category = args.category.trim().to_lowercase();
    if category.is_empty() {
        bail!("category cannot be empty");
    }

    let entry = BudgetEntry {
        id: EntryId::new(new_record_id())?,
        kind: args.kind,
        amount: args.amount,
        category,
        date: date_or_today(args.date.as_deref(), today)?,
        note: args.note.clone(),
    };
    let line = format!(
        "Recorded {} of {} ({}) on {}",
        entry.kind, entry.amount, entry.category, entry.date
    );
    store
        .add_budget_entry(entry)
        .context("failed to save budget entry")?;
    writeln!(writer, "{line}")?;
    Ok(())
}

pub fn summary<W: Write>(
    writer: &mut W,
    store: &Store,
    args: &SummaryArgs,
    today: NaiveDate,
) -> Result<()> {
    let month = date_or_today(args.date.as_deref(), today)?;
    let entries = store.budget_entries()?;
    let events = store.calendar_events()?;
    let summary = summarize_month(&entries, &events, month, today);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    writeln!(
        writer,
        "{} ({} to {})",
        summary.month_start.format("%B %Y"),
        summary.month_start,
        summary.month_end
    )?;
    for (label, amount) in [
        ("Income", summary.income),
        ("Expenses", summary.expenses),
        ("Balance", summary.balance),
        ("Planned", summary.planned),
        ("Available", summary.available),
    ] {
        writeln!(writer, "{:<12}{:>10}", format!("{label}:"), amount.to_string())?;
    }
    if !summary.by_category.is_empty() {
        writeln!(writer, "By category:")?;
        for total in &summary.by_category {
            writeln!(writer, "  {:<10}{:>10}", total.category, total.amount.to_string())?;
        }
    }
    Ok(())
}
