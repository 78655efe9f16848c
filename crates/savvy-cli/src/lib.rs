//! Savvy CLI library.
//!
//! This crate provides the command-line interface for Savvy.

mod cli;
pub mod commands;
mod config;

pub use cli::{BudgetAction, Cli, Commands, EventsAction, GoalsAction, LessonsAction};
pub use config::Config;
