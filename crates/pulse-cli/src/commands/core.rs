//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_engine` - Build the analytics engine from config plus CLI overrides
//! - `resolve_reference_date` / `resolve_end_month` - Date argument parsing
//! - `load_transactions` / `load_ledger` - CSV loading
//! - `cmd_config` - Show the effective configuration

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use pulse_core::analytics::ScoreBound;
use pulse_core::import::{parse_ledger_csv, parse_transactions_csv};
use pulse_core::{AnalyticsConfig, AnalyticsEngine, CustomerTransaction, LedgerRow, YearMonth};
use tracing::{debug, info};

use super::{print_json, Output};

/// Load config and apply per-command overrides
pub fn load_engine(
    config_path: Option<&Path>,
    period_days: Option<i64>,
    months: Option<u32>,
) -> Result<AnalyticsEngine> {
    let (mut config, source) =
        AnalyticsConfig::load(config_path).context("Failed to load analytics config")?;
    debug!(source = %source, "Loaded analytics config");

    if let Some(days) = period_days {
        config.rfm.period_days = days;
    }
    if let Some(months) = months {
        config.forecast.months = months;
    }

    Ok(AnalyticsEngine::new(config))
}

/// Parse `--as-of`, defaulting to today
pub fn resolve_reference_date(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context("Invalid --as-of date format (use YYYY-MM-DD)"),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parse `--end`, defaulting to the current month
pub fn resolve_end_month(end: Option<&str>) -> Result<YearMonth> {
    match end {
        Some(s) => s
            .parse::<YearMonth>()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid --end month format (use YYYY-MM)"),
        None => Ok(YearMonth::current()),
    }
}

/// Read a customer transactions CSV
pub fn load_transactions(path: &Path) -> Result<Vec<CustomerTransaction>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let rows = parse_transactions_csv(file)
        .with_context(|| format!("Failed to parse transactions from {}", path.display()))?;
    info!(rows = rows.len(), file = %path.display(), "Loaded transactions");
    Ok(rows)
}

/// Read a revenue/expense ledger CSV
pub fn load_ledger(path: &Path) -> Result<Vec<LedgerRow>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let rows = parse_ledger_csv(file)
        .with_context(|| format!("Failed to parse ledger from {}", path.display()))?;
    info!(rows = rows.len(), file = %path.display(), "Loaded ledger");
    Ok(rows)
}

fn describe_bound(bound: ScoreBound) -> String {
    match bound {
        ScoreBound::Any => "any".to_string(),
        ScoreBound::AtLeast(min) => format!(">= {}", min),
        ScoreBound::AtMost(max) => format!("<= {}", max),
    }
}

pub fn cmd_config(config_path: Option<&Path>, output: Output) -> Result<()> {
    let (config, source) =
        AnalyticsConfig::load(config_path).context("Failed to load analytics config")?;

    if output == Output::Json {
        return print_json(&serde_json::json!({
            "source": source.to_string(),
            "rfm": { "period_days": config.rfm.period_days },
            "forecast": { "months": config.forecast.months },
            "segment_rules": config.segment_rules,
        }));
    }

    println!("⚙️  Analytics configuration");
    println!("   Source: {}", source);
    println!();
    println!("   RFM window:       {} days", config.rfm.period_days);
    println!("   Forecast history: {} months", config.forecast.months);
    println!();
    println!("   Segment rules (first match wins):");
    println!("   {:15} │ {:>8} │ {:>9} │ {:>8}", "Segment", "Recency", "Frequency", "Monetary");
    println!("   {}", "─".repeat(50));
    for rule in &config.segment_rules {
        println!(
            "   {:15} │ {:>8} │ {:>9} │ {:>8}",
            rule.segment.as_str(),
            describe_bound(rule.recency),
            describe_bound(rule.frequency),
            describe_bound(rule.monetary)
        );
    }
    println!("   {:15} │ {:>8} │ {:>9} │ {:>8}", "General", "any", "any", "any");

    Ok(())
}
