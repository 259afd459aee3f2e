//! Analytics configuration
//!
//! Controls the RFM lookback window, the forecast history length and,
//! optionally, the segment decision table.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/pulse/config/analytics.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::analytics::aggregate::validate_period_days;
use crate::analytics::rfm::{MAX_SCORE, MIN_SCORE};
use crate::analytics::segment::{ScoreBound, SegmentClassifier, SegmentRule, DEFAULT_RULES};
use crate::analytics::series::validate_months;
use crate::error::{Error, Result};
use crate::models::Segment;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// RFM scoring settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfmConfig {
    /// Lookback window in days
    pub period_days: i64,
}

impl Default for RfmConfig {
    fn default() -> Self {
        Self { period_days: 365 }
    }
}

/// Forecast settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Months of history to build before forecasting
    pub months: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { months: 12 }
    }
}

/// Full analytics configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub rfm: RfmConfig,
    pub forecast: ForecastConfig,
    /// Ordered segment decision table
    pub segment_rules: Vec<SegmentRule>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            rfm: RfmConfig::default(),
            forecast: ForecastConfig::default(),
            segment_rules: DEFAULT_RULES.to_vec(),
        }
    }
}

impl AnalyticsConfig {
    /// Load from `path` (or the default override location), falling back to
    /// the embedded defaults
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        load_config(path)
    }

    pub fn classifier(&self) -> SegmentClassifier {
        SegmentClassifier::with_rules(self.segment_rules.clone())
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("pulse").join("config").join("analytics.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<(AnalyticsConfig, ConfigSource)> {
    let candidate = match override_path {
        Some(path) => {
            if !path.exists() {
                warn!(path = %path.display(), "Config file not found, using defaults");
            }
            Some(path.to_path_buf())
        }
        None => default_config_path(),
    };

    if let Some(path) = candidate.filter(|p| p.exists()) {
        let content = fs::read_to_string(&path)?;
        let config = parse_config(&content)?;
        return Ok((config, ConfigSource::File(path)));
    }

    Ok((parse_config(DEFAULT_CONFIG)?, ConfigSource::Embedded))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    rfm: Option<RawRfm>,
    forecast: Option<RawForecast>,
    segments: Option<RawSegments>,
}

#[derive(Debug, Deserialize)]
struct RawRfm {
    period_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    months: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawSegments {
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    segment: String,
    min_recency: Option<u8>,
    max_recency: Option<u8>,
    min_frequency: Option<u8>,
    max_frequency: Option<u8>,
    min_monetary: Option<u8>,
    max_monetary: Option<u8>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(period_days) = raw.rfm.and_then(|r| r.period_days) {
        validate_period_days(period_days)
            .map_err(|e| Error::InvalidData(format!("[rfm] {}", e)))?;
        config.rfm.period_days = period_days;
    }

    if let Some(months) = raw.forecast.and_then(|f| f.months) {
        validate_months(months).map_err(|e| Error::InvalidData(format!("[forecast] {}", e)))?;
        config.forecast.months = months;
    }

    // An empty rule list keeps the built-in table
    if let Some(segments) = raw.segments.filter(|s| !s.rules.is_empty()) {
        config.segment_rules = segments
            .rules
            .iter()
            .map(parse_rule)
            .collect::<Result<Vec<_>>>()?;
    }

    Ok(config)
}

fn parse_rule(raw: &RawRule) -> Result<SegmentRule> {
    let segment: Segment = raw.segment.parse().map_err(Error::InvalidData)?;
    Ok(SegmentRule::new(
        segment,
        parse_bound(segment, "recency", raw.min_recency, raw.max_recency)?,
        parse_bound(segment, "frequency", raw.min_frequency, raw.max_frequency)?,
        parse_bound(segment, "monetary", raw.min_monetary, raw.max_monetary)?,
    ))
}

fn parse_bound(
    segment: Segment,
    dimension: &str,
    min: Option<u8>,
    max: Option<u8>,
) -> Result<ScoreBound> {
    for score in [min, max].into_iter().flatten() {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(Error::InvalidData(format!(
                "{} rule: {} bound {} outside {}..={}",
                segment, dimension, score, MIN_SCORE, MAX_SCORE
            )));
        }
    }

    match (min, max) {
        (None, None) => Ok(ScoreBound::Any),
        (Some(min), None) => Ok(ScoreBound::AtLeast(min)),
        (None, Some(max)) => Ok(ScoreBound::AtMost(max)),
        (Some(_), Some(_)) => Err(Error::InvalidData(format!(
            "{} rule: set either min_{} or max_{}, not both",
            segment, dimension, dimension
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
        assert_eq!(config.rfm.period_days, 365);
        assert_eq!(config.forecast.months, 12);
    }

    #[test]
    fn test_parse_overrides() {
        let config = parse_config(
            r#"
            [rfm]
            period_days = 90

            [forecast]
            months = 24
            "#,
        )
        .unwrap();

        assert_eq!(config.rfm.period_days, 90);
        assert_eq!(config.forecast.months, 24);
        assert_eq!(config.segment_rules, DEFAULT_RULES.to_vec());
    }

    #[test]
    fn test_parse_custom_rules() {
        let config = parse_config(
            r#"
            [[segments.rules]]
            segment = "VIP"
            min_monetary = 5

            [[segments.rules]]
            segment = "dormant"
            max_recency = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.segment_rules.len(), 2);
        let classifier = config.classifier();
        assert_eq!(classifier.classify(1, 1, 5), Segment::Vip);
        assert_eq!(classifier.classify(1, 5, 4), Segment::Dormant);
        assert_eq!(classifier.classify(3, 3, 3), Segment::General);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_config("[rfm]\nperiod_days = 0").is_err());
        assert!(parse_config("[forecast]\nmonths = 61").is_err());
        assert!(parse_config("[[segments.rules]]\nsegment = \"Gold\"").is_err());
        assert!(parse_config("[[segments.rules]]\nsegment = \"VIP\"\nmin_recency = 6").is_err());
        assert!(parse_config(
            "[[segments.rules]]\nsegment = \"VIP\"\nmin_recency = 2\nmax_recency = 4"
        )
        .is_err());
        assert!(parse_config("not = [valid").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics.toml");
        fs::write(&path, "[rfm]\nperiod_days = 30\n").unwrap();

        let (config, source) = AnalyticsConfig::load(Some(&path)).unwrap();
        assert_eq!(config.rfm.period_days, 30);
        assert_eq!(source, ConfigSource::File(path));
    }

    #[test]
    fn test_unreadable_config_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        // A directory exists but cannot be read as a file
        let result = AnalyticsConfig::load(Some(dir.path()));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let (config, source) = AnalyticsConfig::load(Some(&path)).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
        assert_eq!(source, ConfigSource::Embedded);
    }
}
