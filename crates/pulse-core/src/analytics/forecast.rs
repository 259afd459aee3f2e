//! Trend forecasting
//!
//! Fits an ordinary least-squares line to a monthly series (x = month index
//! 0, 1, 2, ...), derives a per-calendar-month seasonal index from the ratio
//! of actuals to that line, and projects the next month and quarter.
//!
//! Sparse or flat histories never fail:
//! - fewer than 2 points: slope 0, the line is flat at the single value
//! - fewer than 3 points: confidence 0
//! - constant or all-zero series: slope 0, neutral seasonality, confidence 1
//! - months without a usable ratio: seasonal index 1.0
//!
//! Only non-finite numbers are errors.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{ForecastResult, MonthlyPoint, YearMonth};

/// Trend values at or below this are not used as a ratio denominator
const TREND_EPSILON: f64 = 1e-9;

/// Seasonal index for months with no usable history
pub const NEUTRAL_SEASONALITY: f64 = 1.0;

/// Points needed before R² says anything about the fit
const MIN_POINTS_FOR_CONFIDENCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct TrendLine {
    slope: f64,
    intercept: f64,
}

impl TrendLine {
    fn at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

/// Forecast the months following `series`
pub fn forecast(series: &[MonthlyPoint]) -> Result<ForecastResult> {
    let Some(last) = series.last() else {
        debug!("Empty series, returning flat forecast");
        return Ok(empty_forecast());
    };

    if let Some(bad) = series.iter().find(|p| !p.actual.is_finite()) {
        return Err(Error::Computation(format!(
            "Non-finite value in series at {}",
            bad.month
        )));
    }

    let values: Vec<f64> = series.iter().map(|p| p.actual).collect();
    let line = fit_trend(&values);
    let confidence = confidence(&values, &line);
    let seasonality = seasonal_index(series, &line);

    let next_month = last.month.succ();
    let mut quarter = [0.0; 3];
    for (step, slot) in quarter.iter_mut().enumerate() {
        let month = next_month.add_months(step as i64);
        let ratio = seasonality
            .get(&month.month())
            .copied()
            .unwrap_or(NEUTRAL_SEASONALITY);
        // Revenue and expense projections cannot go negative
        *slot = (line.at(series.len() + step) * ratio).max(0.0);
    }

    let result = ForecastResult {
        trend_slope: line.slope,
        intercept: line.intercept,
        seasonality,
        predicted_next_month: quarter[0],
        predicted_next_quarter: quarter,
        confidence,
        next_month,
        history_months: series.len(),
    };
    ensure_finite(&result)?;

    debug!(
        points = series.len(),
        slope = result.trend_slope,
        confidence = result.confidence,
        next_month = %result.next_month,
        "Forecast complete"
    );

    Ok(result)
}

/// Least-squares line through (index, value)
fn fit_trend(values: &[f64]) -> TrendLine {
    let n = values.len();
    let first = values.first().copied().unwrap_or(0.0);

    if n < 2 || values.iter().all(|&v| v == first) {
        return TrendLine {
            slope: 0.0,
            intercept: first,
        };
    }

    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n_f;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    let slope = sxy / sxx;
    TrendLine {
        slope,
        intercept: y_mean - slope * x_mean,
    }
}

/// R² of the trend line against the history, clamped to [0, 1]
fn confidence(values: &[f64], line: &TrendLine) -> f64 {
    if values.len() < MIN_POINTS_FOR_CONFIDENCE {
        return 0.0;
    }

    let first = values[0];
    if values.iter().all(|&v| v == first) {
        // A flat line explains a flat series perfectly
        return 1.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    for (i, &y) in values.iter().enumerate() {
        ss_tot += (y - mean).powi(2);
        ss_res += (y - line.at(i)).powi(2);
    }

    if ss_tot <= 0.0 {
        return 1.0;
    }
    (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
}

/// Mean actual/trend ratio per calendar month; all 12 months present
fn seasonal_index(series: &[MonthlyPoint], line: &TrendLine) -> BTreeMap<u32, f64> {
    let mut ratios: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

    for (i, point) in series.iter().enumerate() {
        let trend = line.at(i);
        if trend <= TREND_EPSILON {
            continue;
        }
        let entry = ratios.entry(point.month.month()).or_insert((0.0, 0));
        entry.0 += point.actual / trend;
        entry.1 += 1;
    }

    (1..=12)
        .map(|month| {
            let ratio = ratios
                .get(&month)
                .map(|&(sum, count)| sum / count as f64)
                .unwrap_or(NEUTRAL_SEASONALITY);
            (month, ratio)
        })
        .collect()
}

fn neutral_seasonality() -> BTreeMap<u32, f64> {
    (1..=12).map(|month| (month, NEUTRAL_SEASONALITY)).collect()
}

fn empty_forecast() -> ForecastResult {
    ForecastResult {
        trend_slope: 0.0,
        intercept: 0.0,
        seasonality: neutral_seasonality(),
        predicted_next_month: 0.0,
        predicted_next_quarter: [0.0; 3],
        confidence: 0.0,
        next_month: YearMonth::current().succ(),
        history_months: 0,
    }
}

fn ensure_finite(result: &ForecastResult) -> Result<()> {
    let all_finite = result.trend_slope.is_finite()
        && result.intercept.is_finite()
        && result.confidence.is_finite()
        && result.predicted_next_quarter.iter().all(|v| v.is_finite())
        && result.seasonality.values().all(|v| v.is_finite());

    if all_finite {
        Ok(())
    } else {
        Err(Error::Computation(
            "Forecast produced non-finite values".to_string(),
        ))
    }
}
