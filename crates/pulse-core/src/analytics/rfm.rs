//! RFM scoring
//!
//! Scores are population-relative: each dimension is ranked across the
//! summaries passed in, so the same customer can score differently once the
//! population or window changes. Nothing here is meant to be stored.
//!
//! Ranking uses a stable sort on `(value, customer_id)`; rank `k` of `n`
//! scores `ceil(k * 5 / n)`, which is the quintile split for `n >= 5` and
//! still spreads 1..=5 for smaller populations. Recency keeps the same
//! ascending order but counts ranks from the other end, so the freshest
//! customer holds rank `n`. A dimension where every customer has the same
//! value scores [`NEUTRAL_SCORE`] for everyone.

use tracing::debug;

use crate::models::{RfmScore, TransactionSummary};

use super::segment::SegmentClassifier;

/// Score given to every customer when a dimension has no spread
pub const NEUTRAL_SCORE: u8 = 3;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Score the population and classify each customer with the built-in table
pub fn compute_rfm(summaries: &[TransactionSummary]) -> Vec<RfmScore> {
    compute_rfm_with(summaries, &SegmentClassifier::default())
}

/// Score the population and classify with a custom classifier
///
/// Output order matches input order.
pub fn compute_rfm_with(
    summaries: &[TransactionSummary],
    classifier: &SegmentClassifier,
) -> Vec<RfmScore> {
    if summaries.is_empty() {
        return Vec::new();
    }

    let recency = quantile_scores(summaries, |s| s.recency_days as f64, Direction::LowerIsBetter);
    let frequency = quantile_scores(summaries, |s| s.frequency as f64, Direction::HigherIsBetter);
    let monetary = quantile_scores(summaries, |s| s.monetary, Direction::HigherIsBetter);

    let scores: Vec<RfmScore> = summaries
        .iter()
        .enumerate()
        .map(|(i, summary)| RfmScore {
            customer_id: summary.customer_id.clone(),
            r_score: recency[i],
            f_score: frequency[i],
            m_score: monetary[i],
            segment: classifier.classify(recency[i], frequency[i], monetary[i]),
        })
        .collect();

    debug!(customers = scores.len(), "Scored RFM population");
    scores
}

/// Score for 1-based `rank` in a population of `population`, ascending
pub fn rank_score(rank: usize, population: usize) -> u8 {
    if population == 0 {
        return NEUTRAL_SCORE;
    }
    let score = (rank * MAX_SCORE as usize).div_ceil(population);
    score.clamp(MIN_SCORE as usize, MAX_SCORE as usize) as u8
}

/// Which end of the ascending order scores 5
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// 1..=5 scores for one dimension, indexed like `summaries`
fn quantile_scores<F>(summaries: &[TransactionSummary], value: F, direction: Direction) -> Vec<u8>
where
    F: Fn(&TransactionSummary) -> f64,
{
    let n = summaries.len();
    let first = value(&summaries[0]);
    if summaries.iter().all(|s| value(s) == first) {
        debug!(customers = n, "Degenerate RFM dimension, using neutral score");
        return vec![NEUTRAL_SCORE; n];
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        value(&summaries[a])
            .total_cmp(&value(&summaries[b]))
            .then_with(|| summaries[a].customer_id.cmp(&summaries[b].customer_id))
    });

    let mut scores = vec![NEUTRAL_SCORE; n];
    for (position, &index) in order.iter().enumerate() {
        let rank = match direction {
            Direction::HigherIsBetter => position + 1,
            Direction::LowerIsBetter => n - position,
        };
        scores[index] = rank_score(rank, n);
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Segment;
    use chrono::NaiveDate;

    fn summary(id: &str, recency: i64, frequency: u64, monetary: f64) -> TransactionSummary {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        TransactionSummary {
            customer_id: id.to_string(),
            recency_days: recency,
            frequency,
            monetary,
            first_seen: date,
            last_seen: date,
        }
    }

    #[test]
    fn test_rank_score_quintiles() {
        let scores: Vec<u8> = (1..=10).map(|rank| rank_score(rank, 10)).collect();
        assert_eq!(scores, vec![1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);
    }

    #[test]
    fn test_rank_score_small_population() {
        assert_eq!(rank_score(1, 1), 5);
        assert_eq!(rank_score(1, 2), 3);
        assert_eq!(rank_score(2, 2), 5);
        assert_eq!(rank_score(1, 3), 2);
        assert_eq!(rank_score(2, 3), 4);
        assert_eq!(rank_score(3, 3), 5);
    }

    #[test]
    fn test_monetary_extremes() {
        let population: Vec<TransactionSummary> = [100.0, 200.0, 300.0, 400.0, 500.0]
            .iter()
            .enumerate()
            .map(|(i, &m)| summary(&format!("c{}", i), i as i64 * 10, i as u64 + 1, m))
            .collect();

        let scores = compute_rfm(&population);
        let m: Vec<u8> = scores.iter().map(|s| s.m_score).collect();
        assert_eq!(m, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_recency_is_inverted() {
        let population = vec![
            summary("fresh", 1, 3, 10.0),
            summary("stale", 300, 3, 10.0),
            summary("mid", 60, 3, 10.0),
        ];

        let scores = compute_rfm(&population);
        assert_eq!(scores[0].r_score, 5);
        assert_eq!(scores[1].r_score, 2);
        assert_eq!(scores[2].r_score, 4);
    }

    #[test]
    fn test_recency_ties_follow_customer_id() {
        let population = vec![
            summary("e", 70, 1, 10.0),
            summary("b", 1, 1, 10.0),
            summary("d", 60, 1, 10.0),
            summary("a", 1, 1, 10.0),
            summary("c", 50, 1, 10.0),
        ];

        let scores = compute_rfm(&population);
        let r: Vec<(&str, u8)> = scores
            .iter()
            .map(|s| (s.customer_id.as_str(), s.r_score))
            .collect();
        // a and b share the freshest day count but straddle a quintile boundary
        assert_eq!(r, vec![("e", 1), ("b", 4), ("d", 2), ("a", 5), ("c", 3)]);
    }

    #[test]
    fn test_recency_two_customers() {
        let scores = compute_rfm(&[summary("fresh", 1, 2, 10.0), summary("stale", 300, 1, 5.0)]);
        assert_eq!(scores[0].r_score, 5);
        assert_eq!(scores[1].r_score, 3);
    }

    #[test]
    fn test_degenerate_dimension_gets_neutral_score() {
        let population = vec![
            summary("a", 5, 1, 10.0),
            summary("b", 50, 1, 20.0),
            summary("c", 500, 1, 30.0),
        ];

        let scores = compute_rfm(&population);
        assert!(scores.iter().all(|s| s.f_score == NEUTRAL_SCORE));
        assert_ne!(scores[0].m_score, scores[2].m_score);
    }

    #[test]
    fn test_ties_resolve_by_customer_id() {
        let population: Vec<TransactionSummary> = ["e", "d", "c", "b", "a", "z"]
            .iter()
            .map(|id| summary(id, 10, 2, 100.0))
            .chain(std::iter::once(summary("rich", 10, 2, 900.0)))
            .collect();

        let scores = compute_rfm(&population);
        let by_id = |id: &str| scores.iter().find(|s| s.customer_id == id).unwrap().m_score;
        // Tied customers fill ranks 1..=6 in id order
        assert!(by_id("a") <= by_id("b"));
        assert!(by_id("b") <= by_id("e"));
        assert!(by_id("e") <= by_id("z"));
        assert_eq!(by_id("rich"), 5);
    }

    #[test]
    fn test_scores_in_range_and_stable() {
        let population: Vec<TransactionSummary> = (0..37)
            .map(|i| summary(&format!("c{:02}", i), (i * 7) % 90, (i % 6) as u64, (i * 13 % 41) as f64))
            .collect();

        let first = compute_rfm(&population);
        let second = compute_rfm(&population);
        assert_eq!(first, second);
        for s in &first {
            for score in [s.r_score, s.f_score, s.m_score] {
                assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
            }
        }
    }

    #[test]
    fn test_single_customer_is_neutral() {
        let scores = compute_rfm(&[summary("solo", 3, 4, 50.0)]);
        assert_eq!(scores.len(), 1);
        assert_eq!(
            (scores[0].r_score, scores[0].f_score, scores[0].m_score),
            (3, 3, 3)
        );
        assert_eq!(scores[0].segment, Segment::General);
    }

    #[test]
    fn test_empty_population() {
        assert!(compute_rfm(&[]).is_empty());
    }
}
