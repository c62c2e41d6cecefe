//! Validation of user-uploaded observed streamflow.
//!
//! The dashboard hands over the uploaded file as a JSON array of records:
//!
//! ```json
//! [{"Datetime": "2001-01-01", "Streamflow (m3/s)": 12.4}, ...]
//! ```

use crate::error::{GlowsError, Result};
use crate::time_series::{parse_timestamp, TimeSeries};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

pub const DATETIME_FIELD: &str = "Datetime";
pub const STREAMFLOW_FIELD: &str = "Streamflow (m3/s)";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct ObservedRecord {
    #[serde(rename = "Datetime")]
    datetime: Option<RawValue>,
    #[serde(rename = "Streamflow (m3/s)")]
    streamflow: Option<RawValue>,
}

/// Parse an uploaded record set into a single-column series named
/// `Streamflow (m3/s)`, ordered by time.
///
/// Every failure is reported as [`GlowsError::InvalidObservedData`] so the
/// host can show it to the user instead of a generic failure.
pub fn parse_observed(json: &str) -> Result<TimeSeries> {
    let records: Vec<ObservedRecord> = serde_json::from_str(json)
        .map_err(|e| GlowsError::InvalidObservedData(format!("malformed JSON: {e}")))?;
    if records.is_empty() {
        return Err(GlowsError::InvalidObservedData(
            "the uploaded file contains no records".to_string(),
        ));
    }

    let mut points = Vec::with_capacity(records.len());
    for (row, record) in records.into_iter().enumerate() {
        let time = match record.datetime {
            Some(raw) => parse_datetime(&raw).ok_or_else(|| {
                GlowsError::InvalidObservedData(format!(
                    "record {row}: unparseable {DATETIME_FIELD} value {raw:?}"
                ))
            })?,
            None => {
                return Err(GlowsError::InvalidObservedData(format!(
                    "record {row}: missing '{DATETIME_FIELD}' field"
                )))
            }
        };
        let flow = match record.streamflow {
            Some(RawValue::Number(v)) => v,
            Some(RawValue::Text(s)) => s.trim().parse::<f64>().map_err(|_| {
                GlowsError::InvalidObservedData(format!(
                    "record {row}: non-numeric {STREAMFLOW_FIELD} value '{s}'"
                ))
            })?,
            None => {
                return Err(GlowsError::InvalidObservedData(format!(
                    "record {row}: missing '{STREAMFLOW_FIELD}' field"
                )))
            }
        };
        points.push((time, flow));
    }

    log::debug!("Parsed {} observed records", points.len());
    Ok(TimeSeries::single(STREAMFLOW_FIELD, points))
}

fn parse_datetime(raw: &RawValue) -> Option<NaiveDateTime> {
    match raw {
        // pandas writes datetimes as epoch milliseconds by default
        RawValue::Number(ms) if ms.is_finite() => {
            DateTime::from_timestamp_millis(*ms as i64).map(|dt| dt.naive_utc())
        }
        RawValue::Number(_) => None,
        RawValue::Text(s) => parse_timestamp(s),
    }
}
