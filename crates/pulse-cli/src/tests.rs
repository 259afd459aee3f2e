//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use pulse_core::{EntryKind, YearMonth};
use tempfile::TempDir;

use crate::commands::{self, truncate, Output};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn transactions_file(dir: &TempDir) -> PathBuf {
    write_file(
        dir,
        "transactions.csv",
        "customer_id,amount,date\n\
         alice,120.00,2024-06-20\n\
         alice,80.00,2024-05-02\n\
         bob,15.00,2023-09-14\n\
         carol,\"$1,250.00\",2024-06-01\n",
    )
}

fn ledger_file(dir: &TempDir) -> PathBuf {
    let mut csv = String::from("date,amount,kind\n");
    for month in 1..=6 {
        csv.push_str(&format!("2024-{:02}-10,{},revenue\n", month, 1000 + 50 * month));
        csv.push_str(&format!("2024-{:02}-25,400,expense\n", month));
    }
    write_file(dir, "ledger.csv", &csv)
}

fn missing_config(dir: &TempDir) -> PathBuf {
    dir.path().join("no-such-config.toml")
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a-very-long-customer-id", 10), "a-very-...");
    assert_eq!(truncate("고객번호12345678", 6), "고객번...");
}

#[test]
fn test_resolve_reference_date() {
    let date = commands::resolve_reference_date(Some("2024-06-30")).unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    assert!(commands::resolve_reference_date(Some("06/30/2024")).is_err());
    assert!(commands::resolve_reference_date(None).is_ok());
}

#[test]
fn test_resolve_end_month() {
    let month = commands::resolve_end_month(Some("2024-06")).unwrap();
    assert_eq!(month, YearMonth::new(2024, 6).unwrap());
    assert!(commands::resolve_end_month(Some("2024-13")).is_err());
    assert_eq!(commands::resolve_end_month(None).unwrap(), YearMonth::current());
}

// ========== Engine Loading Tests ==========

#[test]
fn test_load_engine_overrides() {
    let dir = TempDir::new().unwrap();
    let engine = commands::load_engine(Some(&missing_config(&dir)), Some(90), Some(6)).unwrap();
    assert_eq!(engine.config().rfm.period_days, 90);
    assert_eq!(engine.config().forecast.months, 6);
}

#[test]
fn test_load_engine_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "analytics.toml", "[rfm]\nperiod_days = 30\n");

    let engine = commands::load_engine(Some(&config), None, None).unwrap();
    assert_eq!(engine.config().rfm.period_days, 30);
    assert_eq!(engine.config().forecast.months, 12);
}

#[test]
fn test_load_engine_rejects_bad_config() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "analytics.toml", "[forecast]\nmonths = 0\n");
    assert!(commands::load_engine(Some(&config), None, None).is_err());
}

// ========== Loader Tests ==========

#[test]
fn test_load_transactions() {
    let dir = TempDir::new().unwrap();
    let rows = commands::load_transactions(&transactions_file(&dir)).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3].amount, 1250.0);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = commands::load_ledger(&dir.path().join("missing.csv"));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to open"));
}

// ========== Command Tests ==========

#[test]
fn test_cmd_rfm() {
    let dir = TempDir::new().unwrap();
    let engine = commands::load_engine(Some(&missing_config(&dir)), None, None).unwrap();
    let reference = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

    for output in [Output::Table, Output::Json] {
        let result = commands::cmd_rfm(
            &engine,
            &transactions_file(&dir),
            reference,
            "acme",
            0,
            output,
        );
        assert!(result.is_ok());
    }
}

#[test]
fn test_cmd_rfm_invalid_period() {
    let dir = TempDir::new().unwrap();
    let engine = commands::load_engine(Some(&missing_config(&dir)), Some(0), None).unwrap();
    let reference = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

    let result = commands::cmd_rfm(
        &engine,
        &transactions_file(&dir),
        reference,
        "acme",
        20,
        Output::Table,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_segment() {
    let dir = TempDir::new().unwrap();
    let engine = commands::load_engine(Some(&missing_config(&dir)), None, None).unwrap();
    assert!(commands::cmd_segment(&engine, 5, 1, 4, Output::Table).is_ok());
    assert!(commands::cmd_segment(&engine, 1, 1, 1, Output::Json).is_ok());
}

#[test]
fn test_cmd_series() {
    let dir = TempDir::new().unwrap();
    let engine = commands::load_engine(Some(&missing_config(&dir)), None, Some(6)).unwrap();
    let end = YearMonth::new(2024, 6).unwrap();

    let ledger = ledger_file(&dir);
    assert!(commands::cmd_series(&engine, &ledger, EntryKind::Revenue, end, Output::Table).is_ok());
    assert!(commands::cmd_series(&engine, &ledger, EntryKind::Expense, end, Output::Json).is_ok());
}

#[test]
fn test_cmd_series_months_out_of_range() {
    let dir = TempDir::new().unwrap();
    let engine = commands::load_engine(Some(&missing_config(&dir)), None, Some(61)).unwrap();
    let end = YearMonth::new(2024, 6).unwrap();

    let result = commands::cmd_series(
        &engine,
        &ledger_file(&dir),
        EntryKind::Revenue,
        end,
        Output::Table,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_forecast() {
    let dir = TempDir::new().unwrap();
    let engine = commands::load_engine(Some(&missing_config(&dir)), None, Some(6)).unwrap();
    let end = YearMonth::new(2024, 6).unwrap();

    let ledger = ledger_file(&dir);
    assert!(commands::cmd_forecast(&engine, &ledger, end, "acme", Output::Table).is_ok());
    assert!(commands::cmd_forecast(&engine, &ledger, end, "acme", Output::Json).is_ok());
}

#[test]
fn test_cmd_forecast_bad_ledger() {
    let dir = TempDir::new().unwrap();
    let engine = commands::load_engine(Some(&missing_config(&dir)), None, None).unwrap();
    let ledger = write_file(&dir, "ledger.csv", "date,amount,kind\n2024-01-05,100,refund\n");

    let result = commands::cmd_forecast(
        &engine,
        &ledger,
        YearMonth::new(2024, 6).unwrap(),
        "acme",
        Output::Table,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_config() {
    let dir = TempDir::new().unwrap();
    assert!(commands::cmd_config(Some(&missing_config(&dir)), Output::Table).is_ok());

    let config = write_file(
        &dir,
        "analytics.toml",
        "[[segments.rules]]\nsegment = \"VIP\"\nmin_monetary = 5\n",
    );
    assert!(commands::cmd_config(Some(&config), Output::Json).is_ok());
}
