//! Wire and domain types for the node status feed.
//!
//! [`StatusRecord`] mirrors the subset of the node's `get_info` JSON
//! that the exporter consumes; [`HeadSnapshot`] is the fully decoded
//! form with timestamps translated to fractional Unix seconds.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Subset of the node's `get_info` response consumed by the exporter.
///
/// The node returns many more fields (chain id, server version, virtual
/// limits); serde ignores everything not listed here. Timestamps stay
/// as the raw strings the node sent until [`HeadSnapshot::from_record`]
/// translates them.
#[derive(Clone, Debug, Deserialize)]
pub struct StatusRecord {
    pub head_block_num: u64,
    pub head_block_time: String,
    pub head_block_producer: String,
    pub last_irreversible_block_num: u64,
    pub last_irreversible_block_time: String,
}

/// Fully decoded chain-head snapshot.
///
/// Block timestamps are fractional seconds since the Unix epoch, ready
/// to be written into gauges.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadSnapshot {
    pub head_block_num: u64,
    pub head_block_time: f64,
    pub producer: String,
    pub last_irreversible_block_num: u64,
    pub last_irreversible_block_time: f64,
}

/// Errors produced while decoding a [`StatusRecord`] into a [`HeadSnapshot`].
#[derive(Debug)]
pub enum InvalidStatus {
    /// A timestamp field held a string chrono could not interpret.
    Timestamp { field: &'static str, value: String },
    /// The producer identifier was empty. An empty label value would
    /// corrupt the per-producer series.
    EmptyProducer,
}

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidStatus::Timestamp { field, value } => {
                write!(f, "unparseable {field} timestamp {value:?}")
            }
            InvalidStatus::EmptyProducer => write!(f, "head_block_producer is empty"),
        }
    }
}

impl std::error::Error for InvalidStatus {}

impl HeadSnapshot {
    /// Decodes a wire record, translating both block timestamps.
    ///
    /// Fails without partial effect: either every field decodes or the
    /// record is rejected as a whole.
    pub fn from_record(record: &StatusRecord) -> Result<Self, InvalidStatus> {
        if record.head_block_producer.is_empty() {
            return Err(InvalidStatus::EmptyProducer);
        }

        let head_block_time =
            block_time_to_unix(&record.head_block_time).map_err(|_| InvalidStatus::Timestamp {
                field: "head_block_time",
                value: record.head_block_time.clone(),
            })?;
        let last_irreversible_block_time = block_time_to_unix(&record.last_irreversible_block_time)
            .map_err(|_| InvalidStatus::Timestamp {
                field: "last_irreversible_block_time",
                value: record.last_irreversible_block_time.clone(),
            })?;

        Ok(Self {
            head_block_num: record.head_block_num,
            head_block_time,
            producer: record.head_block_producer.clone(),
            last_irreversible_block_num: record.last_irreversible_block_num,
            last_irreversible_block_time,
        })
    }
}

/// Converts a block timestamp string to fractional seconds since the
/// Unix epoch.
///
/// nodeos emits offset-less ISO 8601 strings (`2024-01-01T00:00:00.500`)
/// that are UTC by convention; RFC 3339 forms with `Z` or an explicit
/// offset are accepted as well.
pub fn block_time_to_unix(value: &str) -> Result<f64, chrono::ParseError> {
    let utc: DateTime<Utc> = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")?.and_utc(),
    };
    Ok(utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GET_INFO_JSON: &str = r#"
    {
      "server_version": "6c1717c9",
      "chain_id": "8a34ec7df1b8cd06ff4a8abbaa7cc50300823350cadc59ab296cb00d104d2b8f",
      "head_block_num": 286843,
      "last_irreversible_block_num": 286518,
      "last_irreversible_block_time": "2024-01-01T00:00:00.000",
      "head_block_id": "00046066a3b4477f2e69c1c9a30d93b8c1ec6648b29ffe9e28e84e6914a65ac4",
      "head_block_time": "2024-01-01T00:00:00.500",
      "head_block_producer": "eosio",
      "virtual_block_cpu_limit": 200000000
    }
    "#;

    #[test]
    fn status_record_decodes_get_info_subset() {
        let record: StatusRecord = serde_json::from_str(GET_INFO_JSON).expect("record parses");
        assert_eq!(record.head_block_num, 286843);
        assert_eq!(record.head_block_producer, "eosio");
        assert_eq!(record.last_irreversible_block_num, 286518);
        assert_eq!(record.head_block_time, "2024-01-01T00:00:00.500");
    }

    #[test]
    fn status_record_requires_all_fields() {
        let json = r#"{ "head_block_num": 1, "head_block_time": "2024-01-01T00:00:00" }"#;
        assert!(serde_json::from_str::<StatusRecord>(json).is_err());
    }

    #[test]
    fn block_time_with_utc_suffix() {
        let unix = block_time_to_unix("2024-01-01T00:00:00Z").expect("timestamp parses");
        assert_eq!(unix, 1_704_067_200.0);
    }

    #[test]
    fn block_time_keeps_fractional_seconds() {
        let unix = block_time_to_unix("2024-01-01T00:00:00.500").expect("timestamp parses");
        assert_eq!(unix, 1_704_067_200.5);
    }

    #[test]
    fn block_time_without_offset_is_utc() {
        let plain = block_time_to_unix("2024-01-01T00:00:00").expect("timestamp parses");
        let suffixed = block_time_to_unix("2024-01-01T00:00:00Z").expect("timestamp parses");
        assert_eq!(plain, suffixed);
    }

    #[test]
    fn block_time_honours_explicit_offset() {
        let unix = block_time_to_unix("2024-01-01T01:00:00+01:00").expect("timestamp parses");
        assert_eq!(unix, 1_704_067_200.0);
    }

    #[test]
    fn block_time_rejects_garbage() {
        assert!(block_time_to_unix("not-a-timestamp").is_err());
        assert!(block_time_to_unix("").is_err());
    }

    #[test]
    fn from_record_translates_timestamps() {
        let record: StatusRecord = serde_json::from_str(GET_INFO_JSON).expect("record parses");
        let snapshot = HeadSnapshot::from_record(&record).expect("snapshot decodes");
        assert_eq!(
            snapshot,
            HeadSnapshot {
                head_block_num: 286843,
                head_block_time: 1_704_067_200.5,
                producer: "eosio".to_string(),
                last_irreversible_block_num: 286518,
                last_irreversible_block_time: 1_704_067_200.0,
            }
        );
    }

    #[test]
    fn from_record_rejects_bad_timestamp() {
        let mut record: StatusRecord = serde_json::from_str(GET_INFO_JSON).expect("record parses");
        record.head_block_time = "soon".to_string();

        let err = HeadSnapshot::from_record(&record).expect_err("should fail");
        assert!(err.to_string().contains("head_block_time"));
    }

    #[test]
    fn from_record_rejects_empty_producer() {
        let mut record: StatusRecord = serde_json::from_str(GET_INFO_JSON).expect("record parses");
        record.head_block_producer = String::new();

        let err = HeadSnapshot::from_record(&record).expect_err("should fail");
        assert!(matches!(err, InvalidStatus::EmptyProducer));
    }
}
