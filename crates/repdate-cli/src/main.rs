use clap::Parser;
use owo_colors::{OwoColorize, Style};
use repdate_core::db;
use repdate_core::error::CoreError;
use repdate_core::repository::SqliteRepository;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod query_parser;
mod timezone;
mod views;

use query_parser::FilterParseError;

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = cli::Cli::parse();

    let config = config::Config::new().unwrap_or_else(|e| {
        warn!(error = %e, "could not read configuration, using defaults");
        config::Config::default()
    });
    let config = match config.with_overrides(cli.today, cli.timezone) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => exit_with(e.into()),
    };
    let repository = SqliteRepository::new(db_pool);

    let result = match cli.command {
        cli::Commands::Expand(command) => commands::expand::expand_dates(command, &config),
        cli::Commands::Save(command) => commands::save::save_entry(&repository, command).await,
        cli::Commands::Show(command) => {
            commands::show::show_entry(&repository, command, &config).await
        }
        cli::Commands::Dates(command) => {
            commands::dates::list_dates(&repository, command, &config).await
        }
        cli::Commands::Next(command) => {
            commands::next::next_date(&repository, command, &config).await
        }
        cli::Commands::List(command) => {
            commands::list::list_entries(&repository, command, &config).await
        }
        cli::Commands::Group(command) => {
            commands::group::group_entries(&repository, command, &config).await
        }
        cli::Commands::Delete(command) => {
            commands::delete::delete_entry(&repository, command).await
        }
    };

    if let Err(e) = result {
        exit_with(e);
    }
}

/// Logs go to stderr, filtered by `REPDATE_LOG` (falling back to `RUST_LOG`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("REPDATE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(err: anyhow::Error) -> ! {
    handle_error(err);
    std::process::exit(1);
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(id) => {
                eprintln!("{} No repeating date stored for entry {}", "Error:".style(error_style), id.yellow());
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidDate(s) => {
                eprintln!("{} Could not understand date {}", "Error:".style(error_style), s);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else if let Some(filter_error) = err.downcast_ref::<FilterParseError>() {
        eprintln!(
            "{} Invalid filter. Use \"<date> to <date>\" or a single date. ({})",
            "Error:".style(error_style),
            filter_error
        );
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
