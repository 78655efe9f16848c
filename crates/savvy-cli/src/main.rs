use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use savvy_cli::commands::{budget, day, events, goals, lessons, progress, status};
use savvy_cli::{BudgetAction, Cli, Commands, Config, EventsAction, GoalsAction, LessonsAction};
use savvy_core::Curriculum;
use savvy_store::Store;

/// Load config and open the store, ensuring the parent directory exists.
fn open_store(config_path: Option<&Path>) -> Result<(Store, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let store = Store::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((store, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut store, config) = open_store(cli.config.as_deref())?;
    let today = chrono::Local::now().date_naive();
    let curriculum = Curriculum::builtin();
    let out = &mut std::io::stdout().lock();

    match command {
        Commands::Status => status::run(out, &store, &config.database_path)?,
        Commands::Events(action) => match action {
            EventsAction::Add(args) => events::add(out, &mut store, args, today)?,
            EventsAction::List(args) => events::list(out, &store, args, today)?,
            EventsAction::Remove { id } => events::remove(out, &mut store, id)?,
        },
        Commands::Day(args) => day::run(out, &store, args, &config.layout, today)?,
        Commands::Lessons(action) => match action {
            LessonsAction::List => lessons::list(out, &store, &curriculum, config.premium)?,
            LessonsAction::Open { id } => {
                lessons::open(out, &store, &curriculum, id, config.premium)?;
            }
            LessonsAction::Complete { id } => {
                lessons::complete(out, &mut store, &curriculum, id, config.premium)?;
            }
            LessonsAction::Quiz(args) => {
                lessons::quiz(out, &mut store, &curriculum, args, config.premium)?;
            }
        },
        Commands::Progress { json } => progress::run(out, &store, &curriculum, *json)?,
        Commands::Budget(action) => match action {
            BudgetAction::Add(args) => budget::add(out, &mut store, args, today)?,
            BudgetAction::Summary(args) => budget::summary(out, &store, args, today)?,
        },
        Commands::Goals(action) => match action {
            GoalsAction::Add(args) => goals::add(out, &mut store, args, today)?,
            GoalsAction::List => goals::list(out, &store)?,
            GoalsAction::Save(args) => goals::save(out, &mut store, args)?,
        },
    }

    Ok(())
}
