//! Pulse CLI - Customer segmentation and financial forecasting
//!
//! Usage:
//!   pulse rfm --file transactions.csv       Score and segment customers
//!   pulse segment 5 1 4                     Classify a score triple
//!   pulse series --file ledger.csv          Monthly revenue series
//!   pulse forecast --file ledger.csv        Revenue, expense and profit forecast

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let output = if cli.json {
        commands::Output::Json
    } else {
        commands::Output::Table
    };

    match cli.command {
        Commands::Rfm {
            file,
            period_days,
            as_of,
            tenant,
            limit,
        } => {
            let engine = commands::load_engine(cli.config.as_deref(), period_days, None)?;
            let reference = commands::resolve_reference_date(as_of.as_deref())?;
            commands::cmd_rfm(&engine, &file, reference, &tenant, limit, output)
        }
        Commands::Segment { r, f, m } => {
            let engine = commands::load_engine(cli.config.as_deref(), None, None)?;
            commands::cmd_segment(&engine, r, f, m, output)
        }
        Commands::Series {
            file,
            kind,
            months,
            end,
        } => {
            let engine = commands::load_engine(cli.config.as_deref(), None, months)?;
            let kind: pulse_core::EntryKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let end = commands::resolve_end_month(end.as_deref())?;
            commands::cmd_series(&engine, &file, kind, end, output)
        }
        Commands::Forecast {
            file,
            months,
            end,
            tenant,
        } => {
            let engine = commands::load_engine(cli.config.as_deref(), None, months)?;
            let end = commands::resolve_end_month(end.as_deref())?;
            commands::cmd_forecast(&engine, &file, end, &tenant, output)
        }
        Commands::Config => commands::cmd_config(cli.config.as_deref(), output),
    }
}
