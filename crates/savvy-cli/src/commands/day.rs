//! Day view: a day's events laid out into side-by-side columns.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use savvy_core::layout::{EventRect, format_minutes};
use savvy_core::{CalendarEvent, LayoutConfig, TimedLayout, events_on, layout_day};
use savvy_store::Store;

use super::util::date_or_today;

#[derive(Debug, Args)]
pub struct DayArgs {
    /// Day to show (YYYY-MM-DD, today, tomorrow, 'in N days').
    #[arg(long)]
    pub date: Option<String>,

    /// Output as JSON, including card geometry.
    #[arg(long)]
    pub json: bool,

    /// Grid width in pixels used for card geometry.
    #[arg(long, default_value_t = 320.0)]
    pub width: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DayView<'a> {
    date: NaiveDate,
    all_day: Vec<&'a CalendarEvent>,
    timed: Vec<TimedCard<'a>>,
}

#[derive(Debug, Serialize)]
struct TimedCard<'a> {
    title: &'a str,
    #[serde(flatten)]
    layout: &'a TimedLayout,
    rect: EventRect,
}

pub fn run<W: Write>(
    writer: &mut W,
    store: &Store,
    args: &DayArgs,
    layout: &LayoutConfig,
    today: NaiveDate,
) -> Result<()> {
    let date = date_or_today(args.date.as_deref(), today)?;
    let events = store.calendar_events()?;
    let todays = events_on(&events, date);
    let day = layout_day(todays.iter().copied(), layout);
    tracing::debug!(%date, all_day = day.all_day.len(), timed = day.timed.len(), "laid out day");

    let find = |id: &str| todays.iter().copied().find(|e| e.id.as_str() == id);

    if args.json {
        let view = DayView {
            date,
            all_day: day.all_day.iter().filter_map(|id| find(id.as_str())).collect(),
            timed: day
                .timed
                .iter()
                .filter_map(|t| {
                    find(t.event_id.as_str()).map(|e| TimedCard {
                        title: &e.title,
                        layout: t,
                        rect: layout.geometry(t, args.width),
                    })
                })
                .collect(),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&view)?)?;
        return Ok(());
    }

    writeln!(writer, "{}", date.format("%A %Y-%m-%d"))?;
    if day.all_day.is_empty() && day.timed.is_empty() {
        writeln!(writer, "Nothing planned.")?;
        return Ok(());
    }

    if !day.all_day.is_empty() {
        writeln!(writer, "All day:")?;
        for event in day.all_day.iter().filter_map(|id| find(id.as_str())) {
            writeln!(writer, "  {}", event.title)?;
        }
    }
    for slot in &day.timed {
        let title = find(slot.event_id.as_str()).map_or("", |e| e.title.as_str());
        writeln!(
            writer,
            "{}-{}  {}{}",
            format_minutes(slot.start),
            format_minutes(slot.end),
            column_marker(slot),
            title
        )?;
    }
    Ok(())
}

/// Draws which of the cluster's columns an event takes, e.g. `[.#.] `.
fn column_marker(slot: &TimedLayout) -> String {
    if slot.columns <= 1 {
        return String::new();
    }
    let cells: String = (0..slot.columns)
        .map(|c| if c == slot.column { '#' } else { '.' })
        .collect();
    format!("[{cells}] ")
}
