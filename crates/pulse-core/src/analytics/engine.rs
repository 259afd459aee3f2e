//! Analytics engine - runs the customer and finance pipelines end to end

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::AnalyticsConfig;
use crate::models::{
    CustomerSegmentation, CustomerTransaction, LedgerEntry, ProfitForecast, Segment, YearMonth,
};
use crate::Result;

use super::aggregate::aggregate_transactions;
use super::fingerprint::{data_version, AnalysisKey};
use super::forecast::forecast;
use super::report::assemble_profit_forecast;
use super::rfm::compute_rfm_with;
use super::segment::SegmentClassifier;
use super::series::build_monthly_series;
use super::summary::summarize_segments;

/// Stateless engine over a fixed configuration
///
/// Every call recomputes from the rows it is given; nothing is cached
/// between calls.
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    classifier: SegmentClassifier,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        let classifier = config.classifier();
        Self { config, classifier }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Classify a score triple with the configured rule table
    pub fn classify(&self, r: u8, f: u8, m: u8) -> Segment {
        self.classifier.classify(r, f, m)
    }

    /// Aggregate, score, classify and summarize customers as of `reference`
    pub fn segment_customers(
        &self,
        transactions: &[CustomerTransaction],
        reference: NaiveDate,
    ) -> Result<CustomerSegmentation> {
        let period_days = self.config.rfm.period_days;

        let summaries = aggregate_transactions(transactions, period_days, reference)?;
        let scores = compute_rfm_with(&summaries, &self.classifier);
        let summary = summarize_segments(&scores, &summaries);

        for entry in summary.iter().filter(|s| s.customers > 0) {
            debug!(
                segment = entry.segment.as_str(),
                customers = entry.customers,
                "Segment size"
            );
        }
        info!(
            customers = scores.len(),
            period_days,
            reference = %reference,
            "Customer segmentation complete"
        );

        Ok(CustomerSegmentation {
            reference_date: reference,
            period_days,
            data_version: data_version(transactions),
            scores,
            summary,
        })
    }

    /// Build revenue and expense series ending at `end` and project profit
    pub fn forecast_finances(
        &self,
        revenue: &[LedgerEntry],
        expense: &[LedgerEntry],
        end: YearMonth,
    ) -> Result<ProfitForecast> {
        let months = self.config.forecast.months;

        let revenue_forecast = forecast(&build_monthly_series(revenue, months, end)?)?;
        let expense_forecast = forecast(&build_monthly_series(expense, months, end)?)?;
        let profit = assemble_profit_forecast(&revenue_forecast, &expense_forecast);

        info!(
            months,
            end = %end,
            revenue_confidence = revenue_forecast.confidence,
            expense_confidence = expense_forecast.confidence,
            next_month_profit = profit.predicted_next_month_profit,
            "Financial forecast complete"
        );

        Ok(profit)
    }

    /// Cache key for a segmentation request
    pub fn segmentation_key(
        &self,
        tenant_id: &str,
        transactions: &[CustomerTransaction],
        reference: NaiveDate,
    ) -> AnalysisKey {
        AnalysisKey::new(
            tenant_id,
            format!("rfm:{}d@{}", self.config.rfm.period_days, reference),
            data_version(transactions),
        )
    }

    /// Cache key for a forecast request
    pub fn forecast_key(
        &self,
        tenant_id: &str,
        revenue: &[LedgerEntry],
        expense: &[LedgerEntry],
        end: YearMonth,
    ) -> AnalysisKey {
        let mut rows = revenue.to_vec();
        // Negated so an expense never collides with a revenue row of equal amount
        rows.extend(expense.iter().map(|e| LedgerEntry {
            date: e.date,
            amount: -e.amount,
        }));
        AnalysisKey::new(
            tenant_id,
            format!("forecast:{}m@{}", self.config.forecast.months, end),
            data_version(&rows),
        )
    }
}
