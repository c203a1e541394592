//! Credit-notice aggregation
//!
//! Sorts notices chronologically and computes the running total.

use super::types::{normalize_timestamp, parse_quantity, AggregatedNotice, CreditNotice};

/// Build the cumulative timeline for a set of notices.
///
/// Notices are ordered by their normalized timestamp with a stable sort, so
/// second- and millisecond-scale inputs interleave chronologically and
/// notices sharing a timestamp keep their input order. Output is 1:1 with
/// input. Quantities are not validated: negative amounts are summed as-is and
/// unparseable ones turn the running total into `NaN` from that point on.
pub fn aggregate(notices: &[CreditNotice]) -> Vec<AggregatedNotice> {
    let mut sorted: Vec<&CreditNotice> = notices.iter().collect();
    sorted.sort_by_key(|n| normalize_timestamp(n.ingested_at));

    let mut cumulative = 0.0_f64;

    sorted
        .into_iter()
        .map(|notice| {
            let amount = parse_quantity(&notice.quantity);
            cumulative += amount;

            AggregatedNotice {
                timestamp: normalize_timestamp(notice.ingested_at),
                amount,
                cumulative_amount: cumulative,
                source: notice.from_process.clone(),
            }
        })
        .collect()
}
