//! CLI subcommand implementations.

pub mod budget;
pub mod day;
pub mod events;
pub mod goals;
pub mod lessons;
pub mod progress;
pub mod status;
pub mod util;
