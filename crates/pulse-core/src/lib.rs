//! Pulse Core Library
//!
//! Analytics engine behind the Pulse business dashboard:
//! - Customer RFM (recency, frequency, monetary) scoring and segmentation
//! - Monthly revenue/expense series and trend + seasonality forecasting
//! - Profit projection from revenue and expense forecasts
//! - Order-independent input fingerprints for caller-side caching
//! - CSV loaders for raw transaction and ledger rows
//! - Layered TOML configuration

pub mod analytics;
pub mod config;
pub mod error;
pub mod import;
pub mod models;

pub use analytics::{
    aggregate_transactions, assemble_profit_forecast, build_monthly_series, classify_segment,
    compute_rfm, data_version, forecast, summarize_segments, AnalysisKey, AnalyticsEngine,
    SegmentClassifier, SegmentRule,
};
pub use config::{AnalyticsConfig, ConfigSource};
pub use error::{Error, Result};
pub use models::{
    CustomerSegmentation, CustomerTransaction, EntryKind, ForecastResult, LedgerEntry, LedgerRow,
    MonthlyPoint, ProfitForecast, RfmScore, Segment, SegmentSummary, TransactionSummary,
    YearMonth,
};
