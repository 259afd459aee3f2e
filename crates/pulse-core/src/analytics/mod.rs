//! Analytics Engine - customer segmentation and financial forecasting
//!
//! Every component is a pure function over an explicit input snapshot.
//! Results are always derived fresh from the rows handed in; scores and
//! forecasts are never meant to be persisted.
//!
//! ## Pipelines
//!
//! - **Customers**: raw transactions → [`aggregate_transactions`] →
//!   [`compute_rfm`] (uses [`classify_segment`]) → [`summarize_segments`]
//! - **Finances**: raw ledger rows → [`build_monthly_series`] →
//!   [`forecast`] → [`assemble_profit_forecast`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pulse_core::analytics::AnalyticsEngine;
//!
//! let engine = AnalyticsEngine::new(config);
//! let segmentation = engine.segment_customers(&transactions, today)?;
//! let profit = engine.forecast_finances(&revenue, &expense, YearMonth::current())?;
//! ```

pub mod aggregate;
pub mod engine;
pub mod fingerprint;
pub mod forecast;
pub mod report;
pub mod rfm;
pub mod segment;
pub mod series;
pub mod summary;

pub use aggregate::aggregate_transactions;
pub use engine::AnalyticsEngine;
pub use fingerprint::{data_version, AnalysisKey, Fingerprint};
pub use forecast::forecast;
pub use report::assemble_profit_forecast;
pub use rfm::{compute_rfm, compute_rfm_with};
pub use segment::{classify_segment, ScoreBound, SegmentClassifier, SegmentRule, DEFAULT_RULES};
pub use series::{build_monthly_series, build_monthly_series_to_date, MAX_SERIES_MONTHS};
pub use summary::summarize_segments;
