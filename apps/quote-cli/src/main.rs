//! # Stoneworks CLI
//!
//! Prices stone-fabrication projects and manages the resulting quotes.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           stoneworks                                    │
//! │                                                                         │
//! │  generate --project <id> [--zone metro|regional]                       │
//! │      price the project, store a Draft quote, print it as JSON          │
//! │                                                                         │
//! │  show --quote <id>             print a stored quote as JSON            │
//! │  list --project <id>           one line per quote of the project       │
//! │  status --quote <id> --to <s>  sent | approved | rejected | expired    │
//! │  expire                        expire open quotes past valid_until     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr (`RUST_LOG`), quote output to stdout.
//!
//! Each invocation runs one command. The QUOTE_IN_PROGRESS guard in
//! [`QuoteService`] only spans a single process, so concurrent `generate`
//! runs in separate processes are not rejected.

mod config;
mod error;
mod service;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use stoneworks_core::{DeliveryZone, Quote, QuoteStatus};
use stoneworks_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::service::QuoteService;

#[derive(Debug, Parser)]
#[command(name = "stoneworks", version, about = "Stone fabrication quoting")]
struct Cli {
    /// Configuration file (TOML). Falls back to $STONEWORKS_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a new quote for a project
    Generate {
        #[arg(long)]
        project: String,

        /// Override the project's delivery zone
        #[arg(long)]
        zone: Option<DeliveryZone>,
    },

    /// Print a stored quote
    Show {
        #[arg(long)]
        quote: String,
    },

    /// List the quotes of a project
    List {
        #[arg(long)]
        project: String,
    },

    /// Move a quote to a new status
    Status {
        #[arg(long)]
        quote: String,

        #[arg(long)]
        to: QuoteStatus,
    },

    /// Expire open quotes whose validity window has passed
    Expire,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Generate { .. } => "generate",
            Command::Show { .. } => "show",
            Command::List { .. } => "list",
            Command::Status { .. } => "status",
            Command::Expire => "expire",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!(
        database = %config.database_path.display(),
        validity_days = config.pricing.validity_days,
        "Configuration loaded"
    );

    let missing = config.pricing.rates.missing_entries();
    if !missing.is_empty() {
        tracing::warn!(?missing, "Rate table is incomplete; affected quotes will fail");
    }

    let db = Database::new(DbConfig::new(&config.database_path))
        .await
        .context("Failed to open database")?;

    let service = QuoteService::new(db.clone(), config.pricing);
    let name = cli.command.name();
    let result = run(&service, cli.command).await;

    db.close().await;

    result.map_err(|e| {
        let code = e.code();
        anyhow::Error::new(e).context(format!("{name} failed [{code}]"))
    })
}

async fn run(service: &QuoteService, command: Command) -> AppResult<()> {
    match command {
        Command::Generate { project, zone } => {
            let quote = service.generate(&project, zone).await?;
            print_json(&quote);
        }
        Command::Show { quote } => {
            let quote = service.show(&quote).await?;
            print_json(&quote);
        }
        Command::List { project } => {
            let quotes = service.list(&project).await?;
            if quotes.is_empty() {
                println!("No quotes for project {project}");
            }
            for quote in &quotes {
                println!("{}", summary_line(quote));
            }
        }
        Command::Status { quote, to } => {
            let quote = service.set_status(&quote, to).await?;
            print_json(&quote);
        }
        Command::Expire => {
            let expired = service.expire().await?;
            println!("Expired {} quote(s)", expired.len());
            for id in expired {
                println!("  {id}");
            }
        }
    }
    Ok(())
}

fn print_json(quote: &Quote) {
    match serde_json::to_string_pretty(quote) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize quote"),
    }
}

fn summary_line(quote: &Quote) -> String {
    format!(
        "{}  v{}  {:<8}  {:>12}  valid until {}  [{}]",
        quote.quote_number,
        quote.version,
        quote.status.as_str(),
        quote.total.rounded().to_string(),
        quote.valid_until.format("%Y-%m-%d"),
        quote.id
    )
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stoneworks_core=trace` - Show trace for the engine only
/// - Default: INFO, DEBUG for the stoneworks crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stoneworks=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_with_zone() {
        let cli = Cli::try_parse_from(["stoneworks", "generate", "--project", "proj-001", "--zone", "regional"]).unwrap();
        match cli.command {
            Command::Generate { project, zone } => {
                assert_eq!(project, "proj-001");
                assert_eq!(zone, Some(DeliveryZone::Regional));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["stoneworks", "status", "--quote", "q-1", "--to", "sent"]).unwrap();
        assert!(matches!(cli.command, Command::Status { to: QuoteStatus::Sent, .. }));
        assert!(Cli::try_parse_from(["stoneworks", "status", "--quote", "q-1", "--to", "bogus"]).is_err());
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::try_parse_from(["stoneworks", "expire", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.command.name(), "expire");
    }
}
