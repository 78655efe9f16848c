//! Core domain logic for Savvy.
//!
//! This crate contains the fundamental types and logic for:
//! - Layout: positioning a day's timed events in side-by-side columns
//! - Progression: the lesson unlock chain, progress and premium gating
//! - Finance: monthly totals, planned payments and savings goals
//!
//! Everything here is pure and synchronous. Callers own storage and pass
//! "today" in explicitly.

pub mod curriculum;
pub mod event;
pub mod finance;
pub mod layout;
pub mod progression;
pub mod types;

pub use curriculum::{Curriculum, Lesson, Level, Quiz, QuizOutcome};
pub use event::{CalendarEvent, EventKind, Recurrence, events_on};
pub use finance::{
    BudgetEntry, BudgetSummary, EntryKind, SavingsGoal, summarize, summarize_month,
};
pub use layout::{DayLayout, LayoutConfig, TimedLayout, layout_day, layout_timed};
pub use progression::{AccessDenied, CompletedLessons, LessonState};
pub use types::{
    ClockTime, EntryId, EventId, GoalId, LessonId, ModuleId, Money, Progress, ValidationError,
};
