//! Pipeline — lead and order tracking from the terminal.
//!
//! # Usage
//!
//! ```text
//! pipeline lead add --name <N> --contact <C> --company <X> [--stage S] [--follow-up DATE]
//! pipeline lead edit|move|rm|show|list|due ...
//! pipeline order add --lead <LEAD_ID> [--stage S] [--courier C --tracking T]
//! pipeline order edit|move|rm|show|list|leads ...
//! pipeline board leads|orders [--search Q]
//! ```
//!
//! The store lives at `~/.pipeline/store.yaml` unless `--store` or
//! `PIPELINE_STORE` points elsewhere. Log verbosity follows `PIPELINE_LOG`.

mod commands;
mod context;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{board::BoardArgs, lead::LeadCommand, order::OrderCommand};
use context::StoreContext;
use pipeline_core::PipelineError;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pipeline",
    version,
    about = "Track sales leads and the orders they turn into",
    long_about = None,
)]
struct Cli {
    /// Path to the store snapshot.
    #[arg(long, global = true, env = "PIPELINE_STORE", value_name = "PATH")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create, edit, move and list leads.
    Lead {
        #[command(subcommand)]
        command: LeadCommand,
    },

    /// Create, edit, move and list orders.
    Order {
        #[command(subcommand)]
        command: OrderCommand,
    },

    /// Show a kanban board with one column per stage.
    Board(BoardArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = StoreContext::open(cli.store.as_deref())?;
    match cli.command {
        Commands::Lead { command } => commands::lead::run(&mut ctx, command),
        Commands::Order { command } => commands::order::run(&mut ctx, command),
        Commands::Board(args) => args.run(&ctx),
    }
}

/// Validation failures list one line per field, like a form would.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::Validation { errors }) => {
            eprintln!("error: validation failed");
            for field in errors {
                eprintln!("  {}: {}", field.field, field.message);
            }
        }
        _ => eprintln!("error: {err:#}"),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_env("PIPELINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
