//! Domain models for Pulse

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A raw customer transaction or visit, as handed over by the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerTransaction {
    pub customer_id: String,
    pub amount: f64,
    pub date: NaiveDate,
}

/// A raw revenue or expense record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Which side of the books a ledger row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Revenue,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" | "income" | "sales" => Ok(Self::Revenue),
            "expense" | "expenses" | "cost" => Ok(Self::Expense),
            _ => Err(format!(
                "Unknown entry kind: {} (valid: revenue, expense)",
                s
            )),
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger row tagged with its kind (one line of a ledger CSV)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: EntryKind,
}

impl LedgerRow {
    pub fn entry(&self) -> LedgerEntry {
        LedgerEntry {
            date: self.date,
            amount: self.amount,
        }
    }
}

/// Split tagged ledger rows into (revenue, expense) entry lists
pub fn split_ledger(rows: &[LedgerRow]) -> (Vec<LedgerEntry>, Vec<LedgerEntry>) {
    let mut revenue = Vec::new();
    let mut expense = Vec::new();
    for row in rows {
        match row.kind {
            EntryKind::Revenue => revenue.push(row.entry()),
            EntryKind::Expense => expense.push(row.entry()),
        }
    }
    (revenue, expense)
}

/// Per-customer reduction of the transactions inside an analysis window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub customer_id: String,
    /// Whole days between the last transaction and the reference date
    pub recency_days: i64,
    pub frequency: u64,
    pub monetary: f64,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
}

/// Business-facing customer segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "VIP")]
    Vip,
    Excellent,
    #[serde(rename = "Potential_VIP")]
    PotentialVip,
    General,
    AtRisk,
    Dormant,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Excellent => "Excellent",
            Self::PotentialVip => "Potential_VIP",
            Self::General => "General",
            Self::AtRisk => "AtRisk",
            Self::Dormant => "Dormant",
        }
    }

    /// All segments, in dashboard display order
    pub fn all() -> &'static [Segment] {
        &[
            Self::Vip,
            Self::Excellent,
            Self::PotentialVip,
            Self::General,
            Self::AtRisk,
            Self::Dormant,
        ]
    }
}

impl std::str::FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "vip" => Ok(Self::Vip),
            "excellent" => Ok(Self::Excellent),
            "potential_vip" | "potentialvip" => Ok(Self::PotentialVip),
            "general" => Ok(Self::General),
            "atrisk" | "at_risk" => Ok(Self::AtRisk),
            "dormant" => Ok(Self::Dormant),
            _ => Err(format!("Unknown segment: {}", s)),
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// RFM scores for one customer within the current population snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfmScore {
    pub customer_id: String,
    pub r_score: u8,
    pub f_score: u8,
    pub m_score: u8,
    pub segment: Segment,
}

/// A calendar month, written as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns None unless `month` is 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month in local time
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month of year (1..=12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by a (possibly negative) number of months
    pub fn add_months(self, months: i64) -> Self {
        let ordinal = self.year as i64 * 12 + (self.month as i64 - 1) + months;
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn succ(self) -> Self {
        self.add_months(1)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid month: {} (use YYYY-MM)", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in month: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month: {} (use YYYY-MM)", s))?;
        Self::new(year, month).ok_or_else(|| format!("Month out of range: {}", s))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Total for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: YearMonth,
    pub actual: f64,
}

/// Trend + seasonality projection for one monthly series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Change per month of the least-squares trend line
    pub trend_slope: f64,
    /// Trend value at the first month of the history
    pub intercept: f64,
    /// Calendar month (1..=12) -> mean ratio of actual to trend
    pub seasonality: BTreeMap<u32, f64>,
    /// Trend times seasonal ratio for `next_month`, floored at 0
    pub predicted_next_month: f64,
    /// The three months from `next_month` on, each floored at 0
    pub predicted_next_quarter: [f64; 3],
    /// R² of the trend fit, in [0, 1]
    pub confidence: f64,
    /// The month `predicted_next_month` refers to
    pub next_month: YearMonth,
    pub history_months: usize,
}

/// Profit projection derived from revenue and expense forecasts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitForecast {
    pub predicted_next_month_profit: f64,
    pub predicted_next_quarter_profit: [f64; 3],
    pub revenue: ForecastResult,
    pub expense: ForecastResult,
}

/// Size and value of one segment in a scored population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: Segment,
    pub customers: usize,
    /// Fraction of scored customers in this segment
    pub share: f64,
    pub monetary: f64,
}

/// Result of the customer pipeline (aggregate, score, classify, summarize)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSegmentation {
    pub reference_date: NaiveDate,
    pub period_days: i64,
    pub data_version: String,
    pub scores: Vec<RfmScore>,
    pub summary: Vec<SegmentSummary>,
}
