//! Lenient deserialization helpers for backend payloads.
//!
//! The backend is an external service; individual records can be partially
//! populated. These helpers normalize such records at the boundary so that one
//! bad record never fails a whole payload.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::money::Money;

/// Treat blank strings as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00.123Z`, with any offset), naive
/// date-times which are taken as UTC, and bare dates at UTC midnight.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Deserialize an optional string, mapping `""` to `None`.
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty(Option::<String>::deserialize(deserializer)?))
}

/// Deserialize a string that may be `null`, mapping `null` to `""`.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a timestamp leniently: unparseable or missing values become `None`.
pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => parse_timestamp(&s),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

/// Deserialize an optional price, mapping `null` and `""` to `None`.
pub fn optional_money<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(other) => Money::deserialize(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Deserialize a list, treating `null` as empty and skipping records that fail
/// to deserialize. Each skipped record is logged at `warn`.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(collect_lenient(raw))
}

/// Deserialize an optional record, turning a malformed record into `None`.
pub fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(decode_or_warn))
}

/// Decode each value, dropping the ones that do not fit `T`.
pub fn collect_lenient<T: DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    values.into_iter().filter_map(decode_or_warn).collect()
}

fn decode_or_warn<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    let id = value.get("id").cloned();
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(error) => {
            tracing::warn!(
                record_id = ?id,
                record_type = std::any::type_name::<T>(),
                %error,
                "skipping malformed record"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("".into())), None);
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" men ".into())), Some("men".into()));
        assert_eq!(non_empty(Some("men".into())), Some("men".into()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let dt = parse_timestamp("2024-05-01T10:00:00.250+06:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 1, 4, 0, 0).unwrap() + chrono::Duration::milliseconds(250));
    }

    #[test]
    fn test_parse_timestamp_naive_is_utc() {
        let dt = parse_timestamp("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.timestamp_subsec_millis(), 123);

        let dt = parse_timestamp("2024-05-01 08:30:00").unwrap();
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_timestamp_date_only() {
        let dt = parse_timestamp("2024-05-01").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 5, 1, 0));
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "lenient_vec")]
        items: Vec<Item>,
        #[serde(default, deserialize_with = "lenient_option")]
        single: Option<Item>,
    }

    #[test]
    fn test_lenient_vec_skips_bad_records() {
        let w: Wrapper =
            serde_json::from_str(r#"{"items":[{"id":1},{"id":"x"},null,{"id":3}]}"#).unwrap();
        assert_eq!(w.items, vec![Item { id: 1 }, Item { id: 3 }]);
        assert!(w.single.is_none());
    }

    #[test]
    fn test_lenient_vec_null_and_missing() {
        let w: Wrapper = serde_json::from_str(r#"{"items":null}"#).unwrap();
        assert!(w.items.is_empty());
        let w: Wrapper = serde_json::from_str("{}").unwrap();
        assert!(w.items.is_empty());
    }

    #[test]
    fn test_lenient_option() {
        let w: Wrapper = serde_json::from_str(r#"{"single":{"id":"bad"}}"#).unwrap();
        assert!(w.single.is_none());
        let w: Wrapper = serde_json::from_str(r#"{"single":{"id":5}}"#).unwrap();
        assert_eq!(w.single, Some(Item { id: 5 }));
    }
}
