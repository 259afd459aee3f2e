//! Customer segmentation command implementations

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use pulse_core::{AnalyticsEngine, CustomerSegmentation};

use super::{load_transactions, print_json, truncate, Output};

pub fn cmd_rfm(
    engine: &AnalyticsEngine,
    file: &Path,
    reference: NaiveDate,
    tenant: &str,
    limit: usize,
    output: Output,
) -> Result<()> {
    let rows = load_transactions(file)?;
    let result = engine
        .segment_customers(&rows, reference)
        .context("Customer segmentation failed")?;
    let key = engine.segmentation_key(tenant, &rows, reference);

    if output == Output::Json {
        return print_json(&serde_json::json!({
            "key": key.to_string(),
            "result": result,
        }));
    }

    print_segmentation(&result, limit);
    println!();
    println!("   Cache key: {}", truncate(&key.to_string(), 60));

    Ok(())
}

fn print_segmentation(result: &CustomerSegmentation, limit: usize) {
    println!(
        "📊 RFM segmentation as of {} ({} day window)",
        result.reference_date, result.period_days
    );
    println!();

    if result.scores.is_empty() {
        println!("   No customers with transactions in the window.");
        return;
    }

    println!("   {:15} │ {:>9} │ {:>6} │ {:>12}", "Segment", "Customers", "Share", "Monetary");
    println!("   {}", "─".repeat(52));
    for entry in &result.summary {
        println!(
            "   {:15} │ {:>9} │ {:>5.1}% │ {:>12.2}",
            entry.segment.as_str(),
            entry.customers,
            entry.share * 100.0,
            entry.monetary
        );
    }

    println!();
    println!("   {:25} │ R │ F │ M │ Segment", "Customer");
    println!("   {}", "─".repeat(52));
    let shown = if limit == 0 {
        result.scores.len()
    } else {
        limit.min(result.scores.len())
    };
    for score in result.scores.iter().take(shown) {
        println!(
            "   {:25} │ {} │ {} │ {} │ {}",
            truncate(&score.customer_id, 25),
            score.r_score,
            score.f_score,
            score.m_score,
            score.segment
        );
    }
    if shown < result.scores.len() {
        println!(
            "   ... and {} more (use --limit 0 to show all)",
            result.scores.len() - shown
        );
    }
}

pub fn cmd_segment(engine: &AnalyticsEngine, r: u8, f: u8, m: u8, output: Output) -> Result<()> {
    let segment = engine.classify(r, f, m);

    if output == Output::Json {
        return print_json(&serde_json::json!({
            "r_score": r,
            "f_score": f,
            "m_score": m,
            "segment": segment,
        }));
    }

    println!("🏷️  R={} F={} M={} → {}", r, f, m, segment);
    Ok(())
}
