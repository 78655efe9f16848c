//! Timed-event layout for the day and week grids.
//!
//! Turns a day's calendar events into positioned cards: a vertical span in
//! minutes and a horizontal column so overlapping events sit side by side.
//!
//! # Algorithm Summary
//!
//! 1. Normalize each event's start/end into minutes since midnight
//! 2. Sort by `(start, end)`; shorter events win ties for the lower column
//! 3. Sweep the sorted events, folding an `active` set (events still running)
//!    and a `cluster` (events transitively overlapping since `active` was
//!    last empty); each event takes the lowest column free in `active`
//! 4. When `active` drains, every event in the cluster gets
//!    `columns = max(column) + 1`
//!
//! Layout never fails: unusable times fall back to a 30 minute slot at 09:00.

use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;
use crate::types::{ClockTime, EventId, MINUTES_PER_DAY};

/// Start time used when an event has no usable `time`.
pub const DEFAULT_START: ClockTime = ClockTime::from_minutes(9 * 60);

/// Length of an event with no usable end time.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Shortest span an event occupies on the grid.
pub const MIN_DURATION_MINUTES: u32 = 15;

/// Grid constants shared by the layout engine and renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed padding above 00:00, added to every `top`.
    pub header_offset: u32,
    /// Narrowest card width in pixels.
    pub min_width: f32,
    /// Horizontal gap between side-by-side cards.
    pub gap: f32,
    /// Space reserved left of the grid for hour labels.
    pub left_margin: f32,
    /// Shortest card height in pixels.
    pub min_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_offset: 0,
            min_width: 18.0,
            gap: 4.0,
            left_margin: 56.0,
            min_height: 30,
        }
    }
}

/// A normalized event span in minutes since midnight.
///
/// Always satisfies `start < end <= 1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: u32,
    pub end: u32,
}

impl TimeSpan {
    /// Derives the span an event occupies on the grid.
    pub fn of(event: &CalendarEvent) -> Self {
        let start_time = parse_time(event, event.time.as_deref(), "time").unwrap_or(DEFAULT_START);
        let raw_end = parse_time(event, event.end_time.as_deref(), "endTime")
            .unwrap_or_else(|| start_time.add_minutes(DEFAULT_DURATION_MINUTES));

        let start = start_time.minutes();
        let end = (start + MIN_DURATION_MINUTES).max(raw_end.minutes());
        Self {
            start,
            end: end.min(MINUTES_PER_DAY),
        }
    }

    /// Length in minutes.
    pub const fn duration(&self) -> u32 {
        self.end - self.start
    }
}

fn parse_time(
    event: &CalendarEvent,
    value: Option<&str>,
    field: &'static str,
) -> Option<ClockTime> {
    let value = value?;
    match ClockTime::parse(value) {
        Ok(t) => Some(t),
        Err(_) => {
            tracing::trace!(event_id = %event.id, field, value, "ignoring invalid time");
            None
        }
    }
}

/// Formats minutes since midnight as `HH:MM`, rendering end of day as `24:00`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Position of one timed event on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedLayout {
    pub event_id: EventId,
    /// Minutes since midnight.
    pub start: u32,
    /// Minutes since midnight, at most 1440.
    pub end: u32,
    /// `start` plus the configured header offset.
    pub top: u32,
    /// `end - start`.
    pub height: u32,
    /// 0-based horizontal slot.
    pub column: usize,
    /// Slots shared by this event's overlap cluster.
    pub columns: usize,
}

/// A day's calendar split into the all-day lane and the timed grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLayout {
    /// All-day events, in input order.
    pub all_day: Vec<EventId>,
    /// Timed events ordered by `(start, column)`.
    pub timed: Vec<TimedLayout>,
}

/// Pixel rectangle for one event card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutConfig {
    /// Converts a layout record into card geometry for a grid `available_width` wide.
    #[expect(
        clippy::cast_precision_loss,
        reason = "column counts and minute offsets are far below f32 precision limits"
    )]
    pub fn geometry(&self, layout: &TimedLayout, available_width: f32) -> EventRect {
        let columns = layout.columns.max(1) as f32;
        let width = ((available_width - self.gap * (columns - 1.0)) / columns).max(self.min_width);
        let left = self.left_margin + layout.column as f32 * (width + self.gap);
        let height = (layout.end - layout.start).max(self.min_height);
        EventRect {
            left,
            top: layout.top as f32,
            width,
            height: height as f32,
        }
    }
}

/// Lays out one day: all-day events go to their lane, the rest onto the grid.
pub fn layout_day<'a>(
    events: impl IntoIterator<Item = &'a CalendarEvent>,
    config: &LayoutConfig,
) -> DayLayout {
    let (all_day, timed): (Vec<&CalendarEvent>, Vec<&CalendarEvent>) =
        events.into_iter().partition(|e| e.all_day);
    DayLayout {
        all_day: all_day.into_iter().map(|e| e.id.clone()).collect(),
        timed: layout_timed(timed, config),
    }
}

/// Lays out the timed (non-all-day) events of a single day.
///
/// All-day events in the input are skipped.
pub fn layout_timed<'a>(
    events: impl IntoIterator<Item = &'a CalendarEvent>,
    config: &LayoutConfig,
) -> Vec<TimedLayout> {
    let mut spans: Vec<(TimeSpan, &CalendarEvent)> = events
        .into_iter()
        .filter(|e| !e.all_day)
        .map(|e| (TimeSpan::of(e), e))
        .collect();
    // Stable: fully tied events keep input order.
    spans.sort_by_key(|(span, _)| (span.start, span.end));

    let placed = spans
        .iter()
        .fold(Sweep::default(), |sweep, (span, _)| sweep.place(*span))
        .finish();

    let mut layouts: Vec<TimedLayout> = placed
        .into_iter()
        .zip(&spans)
        .map(|(p, (span, event))| TimedLayout {
            event_id: event.id.clone(),
            start: span.start,
            end: span.end,
            top: span.start + config.header_offset,
            height: span.duration(),
            column: p.column,
            columns: p.columns,
        })
        .collect();
    layouts.sort_by_key(|l| (l.start, l.column));
    layouts
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    end: u32,
    column: usize,
    columns: usize,
}

/// Sweep-line state carried through the fold.
///
/// `active` and `cluster` index into `placed`, which grows in sorted order.
#[derive(Debug, Default)]
struct Sweep {
    active: Vec<usize>,
    cluster: Vec<usize>,
    placed: Vec<Placement>,
}

impl Sweep {
    fn place(mut self, span: TimeSpan) -> Self {
        let placed = &self.placed;
        self.active.retain(|&i| placed[i].end > span.start);
        if self.active.is_empty() {
            self.flush();
        }

        let used: Vec<usize> = self.active.iter().map(|&i| self.placed[i].column).collect();
        let column = lowest_free_column(&used);

        let index = self.placed.len();
        self.placed.push(Placement {
            end: span.end,
            column,
            columns: 1,
        });
        self.active.push(index);
        self.cluster.push(index);
        self
    }

    fn flush(&mut self) {
        let Some(max_column) = self.cluster.iter().map(|&i| self.placed[i].column).max() else {
            return;
        };
        for &i in &self.cluster {
            self.placed[i].columns = max_column + 1;
        }
        self.cluster.clear();
        self.active.clear();
    }

    fn finish(mut self) -> Vec<Placement> {
        self.flush();
        self.placed
    }
}

fn lowest_free_column(used: &[usize]) -> usize {
    // With n columns in use, one of 0..=n is always free.
    (0..=used.len())
        .find(|c| !used.contains(c))
        .unwrap_or(used.len())
}
