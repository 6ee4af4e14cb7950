use anyhow::Result;
use cadence_core::db;
use cadence_core::error::CoreError;
use cadence_core::recurrence::RecurrenceError;
use cadence_core::repository::SqliteRepository;
use cadence_core::service::TaskService;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod config;
mod parser;
mod views;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = Config::new();
    let log_level = loaded
        .as_ref()
        .map(|config| config.log_level.clone())
        .unwrap_or_else(|_| Config::default().log_level);
    init_tracing(&log_level);

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load configuration, using defaults");
        Config::default()
    });

    if let Err(e) = run(cli, &config).await {
        handle_error(e);
        std::process::exit(1);
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli, config: &Config) -> Result<()> {
    let today = cli.today.as_deref().map(parser::parse_day).transpose()?;

    let command = match cli.command {
        Commands::NextDate(command) => return commands::next_date::next_date(command, today),
        command => command,
    };

    let db_pool = db::establish_connection(&config.database_path).await?;
    let repository = SqliteRepository::new(db_pool).with_list_limit(config.list_limit);
    let mut service = TaskService::new(repository);
    if let Some(today) = today {
        service = service.with_today(today);
    }

    match command {
        Commands::Add(command) => commands::add::add_task(&service, command).await,
        Commands::List(command) => commands::list::list_tasks(&service, command).await,
        Commands::Show(command) => commands::show::show_task(&service, command).await,
        Commands::Edit(command) => commands::edit::edit_task(&service, command).await,
        Commands::Done(command) => commands::done::done_task(&service, command).await,
        Commands::Delete(command) => commands::delete::delete_task(&service, command).await,
        Commands::NextDate(_) => unreachable!("handled before opening the database"),
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(id) => {
                eprintln!("{} Task with ID '{}' not found.", "Error:".style(error_style), id);
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::Recurrence(e) => print_recurrence_error(e),
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else if let Some(e) = err.downcast_ref::<RecurrenceError>() {
        print_recurrence_error(e);
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}

fn print_recurrence_error(err: &RecurrenceError) {
    let error_style = Style::new().red().bold();
    match err {
        RecurrenceError::Validation(_) | RecurrenceError::Unsupported(_) => {
            eprintln!("{} {}", "Error:".style(error_style), err);
            eprintln!(
                "Rules look like {}, {}, {} or {}.",
                "y".yellow(),
                "d 7".yellow(),
                "w 1,3".yellow(),
                "m 1,-1 1,6".yellow()
            );
        }
        _ => eprintln!("{} {}", "Error:".style(error_style), err),
    }
}
