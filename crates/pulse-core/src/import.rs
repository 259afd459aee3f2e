//! CSV loaders for raw analytics input
//!
//! Two layouts are supported, matched by header name (any column order,
//! case-insensitive, extra columns ignored):
//! - transactions: `customer_id,amount,date`
//! - ledger: `date,amount,kind` where kind is revenue or expense

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CustomerTransaction, EntryKind, LedgerRow};

/// Parse customer transactions from CSV
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<CustomerTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let customer_col = column(&headers, &["customer_id", "customer"])?;
    let amount_col = column(&headers, &["amount"])?;
    let date_col = column(&headers, &["date"])?;

    let mut transactions = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = i + 2;

        let customer_id = field(&record, customer_col, "customer_id", line)?;
        if customer_id.is_empty() {
            return Err(Error::Import(format!("Line {}: empty customer_id", line)));
        }

        transactions.push(CustomerTransaction {
            customer_id: customer_id.to_string(),
            amount: parse_amount(field(&record, amount_col, "amount", line)?)?,
            date: parse_date(field(&record, date_col, "date", line)?)?,
        });
    }

    debug!(rows = transactions.len(), "Parsed transaction CSV");
    Ok(transactions)
}

/// Parse revenue/expense ledger rows from CSV
pub fn parse_ledger_csv<R: Read>(reader: R) -> Result<Vec<LedgerRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_col = column(&headers, &["date"])?;
    let amount_col = column(&headers, &["amount"])?;
    let kind_col = column(&headers, &["kind", "type"])?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = i + 2;

        let kind: EntryKind = field(&record, kind_col, "kind", line)?
            .parse()
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;

        rows.push(LedgerRow {
            date: parse_date(field(&record, date_col, "date", line)?)?,
            amount: parse_amount(field(&record, amount_col, "amount", line)?)?,
            kind,
        });
    }

    debug!(rows = rows.len(), "Parsed ledger CSV");
    Ok(rows)
}

/// Index of the first header matching one of `names`
fn column(headers: &StringRecord, names: &[&str]) -> Result<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        .ok_or_else(|| Error::Import(format!("Missing column: {}", names[0])))
}

fn field<'r>(record: &'r StringRecord, index: usize, name: &str, line: usize) -> Result<&'r str> {
    record
        .get(index)
        .ok_or_else(|| Error::Import(format!("Line {}: missing {}", line, name)))
}

/// Parse a date in one of the common formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '₩', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    let amount = cleaned
        .parse::<f64>()
        .map_err(|_| Error::Import(format!("Unable to parse amount: {}", s)))?;

    if !amount.is_finite() {
        return Err(Error::Import(format!("Amount is not a finite number: {}", s)));
    }
    Ok(amount)
}
