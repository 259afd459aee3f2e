//! Segment classification
//!
//! Maps an (R, F, M) score triple to a [`Segment`] by walking an ordered
//! rule table; the first matching rule wins and anything unmatched is
//! [`Segment::General`]. Business categories change here, never in the scorer.

use serde::{Deserialize, Serialize};

use crate::models::Segment;

/// Constraint on a single score dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBound {
    Any,
    AtLeast(u8),
    AtMost(u8),
}

impl ScoreBound {
    pub fn matches(&self, score: u8) -> bool {
        match *self {
            Self::Any => true,
            Self::AtLeast(min) => score >= min,
            Self::AtMost(max) => score <= max,
        }
    }
}

/// One row of the segment decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRule {
    pub segment: Segment,
    pub recency: ScoreBound,
    pub frequency: ScoreBound,
    pub monetary: ScoreBound,
}

impl SegmentRule {
    pub const fn new(
        segment: Segment,
        recency: ScoreBound,
        frequency: ScoreBound,
        monetary: ScoreBound,
    ) -> Self {
        Self {
            segment,
            recency,
            frequency,
            monetary,
        }
    }

    pub fn matches(&self, r: u8, f: u8, m: u8) -> bool {
        self.recency.matches(r) && self.frequency.matches(f) && self.monetary.matches(m)
    }
}

use ScoreBound::{Any, AtLeast, AtMost};

/// Built-in decision table, evaluated top to bottom
pub const DEFAULT_RULES: &[SegmentRule] = &[
    SegmentRule::new(Segment::Vip, AtLeast(4), AtLeast(4), AtLeast(4)),
    SegmentRule::new(Segment::Excellent, AtLeast(3), AtLeast(3), AtLeast(4)),
    // Recent, infrequent, high spend: upsell target
    SegmentRule::new(Segment::PotentialVip, AtLeast(4), AtMost(2), AtLeast(3)),
    // Was valuable, going cold
    SegmentRule::new(Segment::AtRisk, AtMost(2), AtLeast(3), AtLeast(3)),
    SegmentRule::new(Segment::Dormant, AtMost(2), AtMost(2), Any),
];

/// Segment when no rule matches
pub const FALLBACK_SEGMENT: Segment = Segment::General;

/// Classify a score triple with the built-in table
pub fn classify_segment(r: u8, f: u8, m: u8) -> Segment {
    classify_with(DEFAULT_RULES, r, f, m)
}

fn classify_with(rules: &[SegmentRule], r: u8, f: u8, m: u8) -> Segment {
    rules
        .iter()
        .find(|rule| rule.matches(r, f, m))
        .map(|rule| rule.segment)
        .unwrap_or(FALLBACK_SEGMENT)
}

/// Classifier over an ordered rule list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentClassifier {
    rules: Vec<SegmentRule>,
}

impl SegmentClassifier {
    /// Use a custom rule list instead of [`DEFAULT_RULES`]
    pub fn with_rules(rules: Vec<SegmentRule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, r: u8, f: u8, m: u8) -> Segment {
        classify_with(&self.rules, r, f, m)
    }

    pub fn rules(&self) -> &[SegmentRule] {
        &self.rules
    }
}

impl Default for SegmentClassifier {
    fn default() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }
}
