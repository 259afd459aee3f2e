//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (engine loading, date parsing, CSV loading) and `config`
//! - `segments` - Customer commands (rfm, segment)
//! - `forecast` - Finance commands (series, forecast)

pub mod core;
pub mod forecast;
pub mod segments;

// Re-export command functions for main.rs
pub use core::*;
pub use forecast::*;
pub use segments::*;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
