use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wl_cli::commands::{employee, hours, log, seed};
use wl_cli::{Cli, Commands, Config, EmployeeAction, LogAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<wl_db::Database> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    wl_db::Database::open(&config.database_path).context("failed to open database")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let mut db = open_database(cli.config.as_deref())?;
    let mut out = io::stdout().lock();

    match command {
        Commands::Employee(action) => match action {
            EmployeeAction::Add(args) => employee::add(&mut out, &mut db, args)?,
            EmployeeAction::List { json } => employee::list(&mut out, &db, *json)?,
            EmployeeAction::Show { id } => employee::show(&mut out, &db, *id)?,
            EmployeeAction::Edit(args) => employee::edit(&mut out, &mut db, args)?,
            EmployeeAction::Delete { id } => employee::delete(&mut out, &mut db, *id)?,
        },
        Commands::Log(action) => match action {
            LogAction::Add(args) => log::add(&mut out, &mut db, args)?,
            LogAction::List { employee, json } => {
                log::list(&mut out, &db, *employee, *json, &Local)?;
            }
            LogAction::Show { id } => log::show(&mut out, &db, *id, &Local)?,
            LogAction::Edit(args) => log::edit(&mut out, &mut db, args)?,
            LogAction::Delete { id } => log::delete(&mut out, &mut db, *id)?,
        },
        Commands::Hours { json } => hours::run(&mut out, &db, *json)?,
        Commands::Seed => seed::run(&mut out, &mut db)?,
    }

    out.flush()?;
    Ok(())
}
