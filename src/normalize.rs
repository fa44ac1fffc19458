use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::TransformError;
use crate::model::CellValue;

/// The string form of a cell, used as grouping identity for category and
/// split-by keys. Pure: identical cells always yield identical keys.
pub fn group_key(cell: &CellValue) -> String {
    cell.to_string()
}

/// Extract a cell as a numeric measure value. Null and non-numeric cells
/// propagate as `None` rather than failing, preserving category alignment.
pub fn measure_value(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => Some(*n),
        _ => None,
    }
}

/// Normalize a datetime axis cell into epoch milliseconds, shifted by the
/// caller-supplied UTC offset in minutes.
pub fn temporal_value(cell: &CellValue, utc_offset: i64) -> Result<f64, TransformError> {
    let millis = match cell {
        CellValue::Timestamp(ts) => ts.timestamp_millis(),
        CellValue::String(raw) => parse_timestamp(raw)?.timestamp_millis(),
        // Already numeric: treat as pre-encoded epoch milliseconds.
        CellValue::Number(n) => *n as i64,
        other => {
            return Err(TransformError::InvalidTemporalValue(other.to_string()));
        }
    };
    Ok((millis + utc_offset * 60_000) as f64)
}

/// Parse an ISO-8601 timestamp. Values without an explicit offset are read
/// as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TransformError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(TransformError::InvalidTemporalValue(raw.to_string()))
}
