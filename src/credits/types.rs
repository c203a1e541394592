//! Core data types for credit timelines
//!
//! - `CreditNotice`: an incoming transfer as reported by the notice service
//! - `AggregatedNotice`: one point of the cumulative timeline
//! - `CreditSeries` / `CreditRow`: chart and table projections

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Timestamps above this value are taken to be milliseconds already.
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Normalize an ingestion timestamp to milliseconds.
///
/// Values strictly greater than 1e12 pass through; anything else is read as
/// seconds and multiplied by 1000.
pub fn normalize_timestamp(timestamp: i64) -> i64 {
    if timestamp > MILLIS_THRESHOLD {
        timestamp
    } else {
        timestamp.saturating_mul(1000)
    }
}

/// Parse a decimal quantity string. Unparseable input becomes `NaN`.
pub fn parse_quantity(quantity: &str) -> f64 {
    quantity.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// An incoming token transfer event (read-only here)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditNotice {
    pub id: String,
    pub recipient: String,
    /// Decimal string, not validated
    pub quantity: String,
    pub sender: String,
    /// Process that emitted the notice
    #[serde(alias = "from_process")]
    pub from_process: String,
    /// Seconds or milliseconds, see [`normalize_timestamp`]
    #[serde(alias = "ingested_at")]
    pub ingested_at: i64,
}

/// One point of a cumulative credit timeline
///
/// `cumulative_amount[i] == cumulative_amount[i - 1] + amount[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedNotice {
    /// Milliseconds since epoch
    pub timestamp: i64,
    pub amount: f64,
    #[serde(alias = "cumulativeAmount")]
    pub cumulative_amount: f64,
    /// Source process identifier
    pub source: String,
}

/// A payment method a timeline can be loaded for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Column-oriented projection for line charts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditSeries {
    pub timestamps: Vec<i64>,
    pub amounts: Vec<f64>,
    pub cumulative: Vec<f64>,
}

impl CreditSeries {
    pub fn from_notices(notices: &[AggregatedNotice]) -> Self {
        Self {
            timestamps: notices.iter().map(|n| n.timestamp).collect(),
            amounts: notices.iter().map(|n| n.amount).collect(),
            cumulative: notices.iter().map(|n| n.cumulative_amount).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditRow {
    pub timestamp: i64,
    /// RFC 3339, empty if the timestamp is out of range
    pub date: String,
    pub amount: f64,
    pub cumulative_amount: f64,
    pub source: String,
}

impl From<&AggregatedNotice> for CreditRow {
    fn from(n: &AggregatedNotice) -> Self {
        let date = Utc
            .timestamp_millis_opt(n.timestamp)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();

        Self {
            timestamp: n.timestamp,
            date,
            amount: n.amount,
            cumulative_amount: n.cumulative_amount,
            source: n.source.clone(),
        }
    }
}

/// Table projection, one row per notice in timeline order
pub fn table_rows(notices: &[AggregatedNotice]) -> Vec<CreditRow> {
    notices.iter().map(CreditRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_seconds() {
        assert_eq!(normalize_timestamp(1_700_000_000), 1_700_000_000_000);
    }

    #[test]
    fn test_normalize_millis_passthrough() {
        assert_eq!(normalize_timestamp(1_700_000_000_000), 1_700_000_000_000);
    }

    #[test]
    fn test_normalize_threshold_is_exclusive() {
        // Exactly 1e12 is still read as seconds
        assert_eq!(
            normalize_timestamp(MILLIS_THRESHOLD),
            MILLIS_THRESHOLD * 1000
        );
        assert_eq!(normalize_timestamp(MILLIS_THRESHOLD + 1), MILLIS_THRESHOLD + 1);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("12.5"), 12.5);
        assert_eq!(parse_quantity(" 7 "), 7.0);
        assert_eq!(parse_quantity("-2"), -2.0);
        assert!(parse_quantity("abc").is_nan());
        assert!(parse_quantity("").is_nan());
    }

    #[test]
    fn test_notice_deserializes_camel_case() {
        let json = r#"{
            "id": "n1",
            "recipient": "r",
            "quantity": "100",
            "sender": "s",
            "fromProcess": "p",
            "ingestedAt": 1700000000
        }"#;

        let notice: CreditNotice = serde_json::from_str(json).unwrap();
        assert_eq!(notice.from_process, "p");
        assert_eq!(notice.ingested_at, 1_700_000_000);
    }

    #[test]
    fn test_table_row_date() {
        let notice = AggregatedNotice {
            timestamp: 1_700_000_000_000,
            amount: 1.0,
            cumulative_amount: 1.0,
            source: "p".to_string(),
        };

        let row = CreditRow::from(&notice);
        assert_eq!(row.date, "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_notice_and_row_share_key_case() {
        let notice = AggregatedNotice {
            timestamp: 1_700_000_000_000,
            amount: 2.0,
            cumulative_amount: 3.0,
            source: "p".to_string(),
        };

        let point = serde_json::to_value(&notice).unwrap();
        let row = serde_json::to_value(CreditRow::from(&notice)).unwrap();

        assert_eq!(point["cumulative_amount"], 3.0);
        assert_eq!(row["cumulative_amount"], 3.0);
        assert!(point.get("cumulativeAmount").is_none());
    }

    #[test]
    fn test_series_projection() {
        let notices = vec![
            AggregatedNotice {
                timestamp: 1,
                amount: 2.0,
                cumulative_amount: 2.0,
                source: "a".to_string(),
            },
            AggregatedNotice {
                timestamp: 5,
                amount: 3.0,
                cumulative_amount: 5.0,
                source: "b".to_string(),
            },
        ];

        let series = CreditSeries::from_notices(&notices);
        assert_eq!(series.timestamps, vec![1, 5]);
        assert_eq!(series.cumulative, vec![2.0, 5.0]);
        assert_eq!(series.len(), 2);
    }
}
