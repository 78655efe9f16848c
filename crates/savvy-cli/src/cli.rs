//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::budget::{AddEntryArgs, SummaryArgs};
use crate::commands::day::DayArgs;
use crate::commands::events::{AddEventArgs, ListEventsArgs};
use crate::commands::goals::{AddGoalArgs, SaveArgs};
use crate::commands::lessons::QuizArgs;

/// Family budgeting, planned expenses and a money course for parents.
///
/// All data stays on this device.
#[derive(Debug, Parser)]
#[command(name = "savvy", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show where data is stored and how much there is.
    Status,

    /// Manage calendar events.
    #[command(subcommand)]
    Events(EventsAction),

    /// Show a day's schedule laid out in columns.
    Day(DayArgs),

    /// Work through the money course.
    #[command(subcommand)]
    Lessons(LessonsAction),

    /// Show course progress.
    Progress {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Record income and expenses.
    #[command(subcommand)]
    Budget(BudgetAction),

    /// Track savings goals.
    #[command(subcommand)]
    Goals(GoalsAction),
}

#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// Add an event to the calendar.
    Add(AddEventArgs),
    /// List events, optionally only those on one day.
    List(ListEventsArgs),
    /// Delete an event.
    Remove {
        /// Event ID.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum LessonsAction {
    /// List lessons with their state.
    List,
    /// Open a lesson and show its quiz.
    Open {
        /// Lesson ID (e.g., b-1-1).
        id: String,
    },
    /// Mark a lesson as complete.
    Complete {
        /// Lesson ID.
        id: String,
    },
    /// Answer a lesson's quiz; passing completes the lesson.
    Quiz(QuizArgs),
}

#[derive(Debug, Subcommand)]
pub enum BudgetAction {
    /// Record income or an expense.
    Add(AddEntryArgs),
    /// Show this month's totals.
    Summary(SummaryArgs),
}

#[derive(Debug, Subcommand)]
pub enum GoalsAction {
    /// Create a savings goal.
    Add(AddGoalArgs),
    /// List savings goals.
    List,
    /// Put money towards a goal.
    Save(SaveArgs),
}
