//! Error types for Pulse

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Window or month-count parameter out of its allowed range
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Numeric instability (non-finite sums, overflowed projections)
    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
