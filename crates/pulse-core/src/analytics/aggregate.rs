//! Transaction aggregation
//!
//! Reduces raw per-customer rows to one [`TransactionSummary`] per customer
//! for a lookback window ending on a reference date.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CustomerTransaction, TransactionSummary};

/// Validate a lookback window length
pub fn validate_period_days(period_days: i64) -> Result<()> {
    if period_days <= 0 {
        return Err(Error::InvalidPeriod(format!(
            "period_days must be positive, got {}",
            period_days
        )));
    }
    Ok(())
}

/// Summarize transactions in the `period_days` days ending on `reference`
/// (inclusive). Customers without rows in the window are left out.
///
/// Summaries are ordered by customer id.
pub fn aggregate_transactions(
    transactions: &[CustomerTransaction],
    period_days: i64,
    reference: NaiveDate,
) -> Result<Vec<TransactionSummary>> {
    validate_period_days(period_days)?;

    let window_start = Duration::try_days(period_days)
        .and_then(|d| reference.checked_sub_signed(d))
        .unwrap_or(NaiveDate::MIN);

    struct Acc {
        frequency: u64,
        amounts: Vec<f64>,
        first_seen: NaiveDate,
        last_seen: NaiveDate,
    }

    let mut by_customer: BTreeMap<&str, Acc> = BTreeMap::new();
    let mut skipped = 0usize;

    for tx in transactions {
        if tx.date <= window_start || tx.date > reference {
            skipped += 1;
            continue;
        }
        if !tx.amount.is_finite() {
            return Err(Error::Computation(format!(
                "Non-finite amount for customer {} on {}",
                tx.customer_id, tx.date
            )));
        }

        let acc = by_customer
            .entry(tx.customer_id.as_str())
            .or_insert_with(|| Acc {
                frequency: 0,
                amounts: Vec::new(),
                first_seen: tx.date,
                last_seen: tx.date,
            });
        acc.frequency += 1;
        acc.amounts.push(tx.amount);
        acc.first_seen = acc.first_seen.min(tx.date);
        acc.last_seen = acc.last_seen.max(tx.date);
    }

    let mut summaries = Vec::with_capacity(by_customer.len());
    for (customer_id, mut acc) in by_customer {
        // Canonical order so the sum does not depend on row arrival order
        acc.amounts.sort_by(f64::total_cmp);
        let total: f64 = acc.amounts.iter().sum();
        if !total.is_finite() {
            return Err(Error::Computation(format!(
                "Monetary total overflowed for customer {}",
                customer_id
            )));
        }

        summaries.push(TransactionSummary {
            customer_id: customer_id.to_string(),
            recency_days: (reference - acc.last_seen).num_days(),
            frequency: acc.frequency,
            // Refunds can push the net below zero
            monetary: total.max(0.0),
            first_seen: acc.first_seen,
            last_seen: acc.last_seen,
        });
    }

    debug!(
        customers = summaries.len(),
        rows = transactions.len(),
        outside_window = skipped,
        period_days,
        "Aggregated transactions"
    );

    Ok(summaries)
}

/// Summarize the window ending today (local time)
pub fn aggregate_transactions_to_date(
    transactions: &[CustomerTransaction],
    period_days: i64,
) -> Result<Vec<TransactionSummary>> {
    aggregate_transactions(transactions, period_days, chrono::Local::now().date_naive())
}
