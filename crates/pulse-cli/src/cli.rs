//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pulse - Customer segmentation and financial forecasting
#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Analytics engine for the Pulse business dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analytics config file (defaults to ~/.local/share/pulse/config/analytics.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score customers by recency, frequency and monetary value
    Rfm {
        /// Transactions CSV (customer_id,amount,date)
        #[arg(short, long)]
        file: PathBuf,

        /// Lookback window in days (overrides config)
        #[arg(long, allow_negative_numbers = true)]
        period_days: Option<i64>,

        /// Reference date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Tenant id used for the cache key shown with the results
        #[arg(long, default_value = "default")]
        tenant: String,

        /// Number of customers to list (0 = all)
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Classify an R/F/M score triple into a segment
    Segment {
        /// Recency score (1-5)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        r: u8,
        /// Frequency score (1-5)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        f: u8,
        /// Monetary score (1-5)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        m: u8,
    },

    /// Show a monthly revenue or expense series
    Series {
        /// Ledger CSV (date,amount,kind)
        #[arg(short, long)]
        file: PathBuf,

        /// Which side of the ledger: revenue, expense
        #[arg(short, long, default_value = "revenue")]
        kind: String,

        /// Number of months (1-60, overrides config)
        #[arg(short, long)]
        months: Option<u32>,

        /// Last month of the series, YYYY-MM (defaults to current month)
        #[arg(long)]
        end: Option<String>,
    },

    /// Forecast revenue, expense and profit
    Forecast {
        /// Ledger CSV (date,amount,kind)
        #[arg(short, long)]
        file: PathBuf,

        /// Months of history (1-60, overrides config)
        #[arg(short, long)]
        months: Option<u32>,

        /// Last month of history, YYYY-MM (defaults to current month)
        #[arg(long)]
        end: Option<String>,

        /// Tenant id used for the cache key shown with the results
        #[arg(long, default_value = "default")]
        tenant: String,
    },

    /// Show the effective analytics configuration
    Config,
}
