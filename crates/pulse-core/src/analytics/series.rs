//! Monthly series building
//!
//! Buckets raw revenue or expense rows into calendar-month totals. The
//! series always has exactly the requested number of months, ends at the
//! given month, and carries zero for months without rows.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{LedgerEntry, MonthlyPoint, YearMonth};

/// Longest history a series may cover (five years)
pub const MAX_SERIES_MONTHS: u32 = 60;

/// Validate a requested month count
pub fn validate_months(months: u32) -> Result<()> {
    if months == 0 || months > MAX_SERIES_MONTHS {
        return Err(Error::InvalidPeriod(format!(
            "months must be between 1 and {}, got {}",
            MAX_SERIES_MONTHS, months
        )));
    }
    Ok(())
}

/// Build a `months`-long series ending at `end` (inclusive)
///
/// Rows outside the covered range are ignored. Amounts within a month are
/// summed in sorted order, so the result does not depend on row order.
pub fn build_monthly_series(
    rows: &[LedgerEntry],
    months: u32,
    end: YearMonth,
) -> Result<Vec<MonthlyPoint>> {
    validate_months(months)?;

    let start = end.add_months(-(months as i64 - 1));
    let mut buckets: BTreeMap<YearMonth, Vec<f64>> = BTreeMap::new();

    for row in rows {
        let month = YearMonth::from_date(row.date);
        if month < start || month > end {
            continue;
        }
        buckets.entry(month).or_default().push(row.amount);
    }

    let mut series = Vec::with_capacity(months as usize);
    let mut month = start;
    for _ in 0..months {
        let actual = match buckets.get_mut(&month) {
            Some(amounts) => {
                amounts.sort_by(f64::total_cmp);
                amounts.iter().sum::<f64>()
            }
            None => 0.0,
        };
        if !actual.is_finite() {
            return Err(Error::Computation(format!(
                "Non-finite monthly total for {}",
                month
            )));
        }
        series.push(MonthlyPoint { month, actual });
        month = month.succ();
    }

    debug!(
        months,
        start = %start,
        end = %end,
        populated = buckets.len(),
        "Built monthly series"
    );

    Ok(series)
}

/// Build a series ending at the current local month
pub fn build_monthly_series_to_date(rows: &[LedgerEntry], months: u32) -> Result<Vec<MonthlyPoint>> {
    build_monthly_series(rows, months, YearMonth::current())
}
