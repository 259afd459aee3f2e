//! Segment distribution for a scored population

use std::collections::HashMap;

use crate::models::{RfmScore, Segment, SegmentSummary, TransactionSummary};

/// One entry per segment in display order, including empty segments
///
/// Monetary totals come from `summaries`, matched by customer id.
pub fn summarize_segments(
    scores: &[RfmScore],
    summaries: &[TransactionSummary],
) -> Vec<SegmentSummary> {
    let monetary_by_customer: HashMap<&str, f64> = summaries
        .iter()
        .map(|s| (s.customer_id.as_str(), s.monetary))
        .collect();

    let mut totals: HashMap<Segment, (usize, f64)> = HashMap::new();
    for score in scores {
        let entry = totals.entry(score.segment).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += monetary_by_customer
            .get(score.customer_id.as_str())
            .copied()
            .unwrap_or(0.0);
    }

    let population = scores.len();
    Segment::all()
        .iter()
        .map(|&segment| {
            let (customers, monetary) = totals.get(&segment).copied().unwrap_or((0, 0.0));
            SegmentSummary {
                segment,
                customers,
                share: if population == 0 {
                    0.0
                } else {
                    customers as f64 / population as f64
                },
                monetary,
            }
        })
        .collect()
}
