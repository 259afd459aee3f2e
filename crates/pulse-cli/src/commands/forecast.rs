//! Finance command implementations (monthly series, forecasts)

use std::path::Path;

use anyhow::{Context, Result};
use pulse_core::models::split_ledger;
use pulse_core::{build_monthly_series, AnalyticsEngine, EntryKind, ForecastResult, YearMonth};

use super::{load_ledger, print_json, Output};

pub fn cmd_series(
    engine: &AnalyticsEngine,
    file: &Path,
    kind: EntryKind,
    end: YearMonth,
    output: Output,
) -> Result<()> {
    let rows = load_ledger(file)?;
    let (revenue, expense) = split_ledger(&rows);
    let entries = match kind {
        EntryKind::Revenue => revenue,
        EntryKind::Expense => expense,
    };

    let months = engine.config().forecast.months;
    let series = build_monthly_series(&entries, months, end)
        .with_context(|| format!("Failed to build {} series", kind))?;

    if output == Output::Json {
        return print_json(&series);
    }

    println!("📈 Monthly {} ({} months ending {})", kind, months, end);
    println!();
    println!("   {:8} │ {:>12}", "Month", "Total");
    println!("   {}", "─".repeat(24));
    for point in &series {
        println!("   {:8} │ {:>12.2}", point.month.to_string(), point.actual);
    }
    println!("   {}", "─".repeat(24));
    let total: f64 = series.iter().map(|p| p.actual).sum();
    println!("   {:8} │ {:>12.2}", "Total", total);

    Ok(())
}

pub fn cmd_forecast(
    engine: &AnalyticsEngine,
    file: &Path,
    end: YearMonth,
    tenant: &str,
    output: Output,
) -> Result<()> {
    let rows = load_ledger(file)?;
    let (revenue, expense) = split_ledger(&rows);

    let profit = engine
        .forecast_finances(&revenue, &expense, end)
        .context("Financial forecast failed")?;
    let key = engine.forecast_key(tenant, &revenue, &expense, end);

    if output == Output::Json {
        return print_json(&serde_json::json!({
            "key": key.to_string(),
            "result": profit,
        }));
    }

    println!(
        "🔮 Forecast from {} months of history ending {}",
        engine.config().forecast.months,
        end
    );
    println!();

    print_forecast("Revenue", &profit.revenue);
    println!();
    print_forecast("Expense", &profit.expense);
    println!();

    let quarter = quarter_months(&profit.revenue);
    println!("💰 Profit");
    println!("   {:10} {:>12.2}", format!("{}:", quarter[0]), profit.predicted_next_month_profit);
    for (month, value) in quarter.iter().zip(profit.predicted_next_quarter_profit.iter()).skip(1) {
        println!("   {:10} {:>12.2}", format!("{}:", month), value);
    }
    let quarter_total: f64 = profit.predicted_next_quarter_profit.iter().sum();
    println!("   {:10} {:>12.2}", "Quarter:", quarter_total);

    Ok(())
}

/// The three months the quarter projection covers
fn quarter_months(result: &ForecastResult) -> [YearMonth; 3] {
    let first = result.next_month;
    [first, first.succ(), first.succ().succ()]
}

fn print_forecast(label: &str, result: &ForecastResult) {
    let direction = if result.trend_slope > 0.0 {
        "↑"
    } else if result.trend_slope < 0.0 {
        "↓"
    } else {
        "→"
    };

    println!("   {}", label);
    println!(
        "      Trend:       {} {:.2}/month (intercept {:.2})",
        direction, result.trend_slope, result.intercept
    );
    println!(
        "      Confidence:  {:.0}% ({} months)",
        result.confidence * 100.0,
        result.history_months
    );
    let quarter = quarter_months(result);
    for (month, value) in quarter.iter().zip(result.predicted_next_quarter.iter()) {
        let ratio = result.seasonality.get(&month.month()).copied().unwrap_or(1.0);
        println!("      {}:     {:>12.2}  (season x{:.2})", month, value, ratio);
    }
}
