//! Calendar event commands: add, list and remove.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;

use savvy_core::{CalendarEvent, ClockTime, EventId, EventKind, Money, Recurrence, events_on};
use savvy_store::{Store, new_record_id};

use super::util::{date_or_today, parse_date};

#[derive(Debug, Args)]
pub struct AddEventArgs {
    /// Event title.
    pub title: String,

    /// Day of the event (YYYY-MM-DD, today, tomorrow, 'in N days').
    #[arg(long)]
    pub date: Option<String>,

    /// Start time (HH:MM).
    #[arg(long)]
    pub time: Option<String>,

    /// End time (HH:MM). Must be after the start time.
    #[arg(long)]
    pub end: Option<String>,

    /// Show in the all-day lane instead of the timed grid.
    #[arg(long, conflicts_with_all = ["time", "end"])]
    pub all_day: bool,

    /// How the event repeats (none, daily, weekly, monthly).
    #[arg(long, default_value = "none")]
    pub repeat: Recurrence,

    /// What the event represents (payment, income, reminder).
    #[arg(long = "type", default_value = "reminder")]
    pub kind: EventKind,

    /// Amount for payments and income (e.g., 49.90).
    #[arg(long)]
    pub amount: Option<Money>,

    /// Display color (e.g., #4f86f7).
    #[arg(long)]
    pub color: Option<String>,

    /// Free-form note.
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListEventsArgs {
    /// Only show events occurring on this day.
    #[arg(long)]
    pub date: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Validates the form and saves a new event.
pub fn add<W: Write>(
    writer: &mut W,
    store: &mut Store,
    args: &AddEventArgs,
    today: NaiveDate,
) -> Result<()> {
    let title = args.title.trim();
    if title.is_empty() {
        bail!("title cannot be empty");
    }
    let date = date_or_today(args.date.as_deref(), today)?;

    let start = args.time.as_deref().map(ClockTime::parse).transpose()?;
    let end = args.end.as_deref().map(ClockTime::parse).transpose()?;
    match (start, end) {
        (None, Some(_)) => bail!("an end time needs a start time"),
        (Some(start), Some(end)) if end <= start => {
            bail!("end time {end} must be after start time {start}")
        }
        _ => {}
    }

    let id = EventId::new(new_record_id())?;
    let mut event = CalendarEvent::new(id.clone(), title, date);
    event.time = start.map(|t| t.to_string());
    event.end_time = end.map(|t| t.to_string());
    event.all_day = args.all_day;
    event.recurrence = args.repeat;
    event.kind = args.kind;
    event.amount = args.amount;
    event.color.clone_from(&args.color);
    event.note.clone_from(&args.note);

    store.save_event(event).context("failed to save event")?;
    tracing::debug!(event_id = %id, %date, "event added");
    writeln!(writer, "Added event {id}: {title} on {date}")?;
    Ok(())
}

pub fn list<W: Write>(
    writer: &mut W,
    store: &Store,
    args: &ListEventsArgs,
    today: NaiveDate,
) -> Result<()> {
    let all = store.calendar_events()?;
    let date = args.date.as_deref().map(|d| parse_date(d, today)).transpose()?;
    let mut events: Vec<&CalendarEvent> = match date {
        Some(date) => events_on(&all, date),
        None => all.iter().collect(),
    };
    events.sort_by_key(|e| (date.unwrap_or(e.date), !e.all_day, e.time.clone()));

    if args.json {
        let json = serde_json::to_string_pretty(&events)?;
        writeln!(writer, "{json}")?;
        return Ok(());
    }

    if events.is_empty() {
        writeln!(writer, "No events.")?;
        return Ok(());
    }
    for event in events {
        writeln!(writer, "{}", describe(event, date))?;
    }
    Ok(())
}

pub fn remove<W: Write>(writer: &mut W, store: &mut Store, id: &str) -> Result<()> {
    if !store.remove_event(id)? {
        bail!("event not found: {id}");
    }
    writeln!(writer, "Removed event {id}")?;
    Ok(())
}

/// One-line summary of an event as it appears on `on`, or on its anchor date.
fn describe(event: &CalendarEvent, on: Option<NaiveDate>) -> String {
    let when = if event.all_day {
        "all day".to_string()
    } else {
        match (event.time.as_deref(), event.end_time.as_deref()) {
            (Some(start), Some(end)) => format!("{start}-{end}"),
            (Some(start), None) => start.to_string(),
            _ => "--:--".to_string(),
        }
    };
    let mut line = format!(
        "{}  {when:<11}  {} [{}]",
        on.unwrap_or(event.date),
        event.title,
        event.kind
    );
    if let Some(amount) = event.amount {
        line.push_str(&format!(" {amount}"));
    }
    if event.recurrence != Recurrence::None {
        line.push_str(&format!(" ({})", event.recurrence));
    }
    line.push_str(&format!("  {}", event.id));
    line
}
