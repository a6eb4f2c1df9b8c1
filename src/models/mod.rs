pub mod domain;
pub mod dto;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// Backend ids arrive as strings or bare numbers depending on the table.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_string(&value).ok_or_else(|| D::Error::custom("expected a string or numeric id"))
}

/// RFC 3339 timestamps, or ones without an offset which are taken as UTC.
pub(crate) fn utc_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", raw)))
}

fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamped) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamped.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "id_string")]
        id: String,
        #[serde(default, deserialize_with = "string_or_number")]
        owner: Option<String>,
    }

    #[test]
    fn test_ids_accept_strings_and_numbers() {
        let row: Row = serde_json::from_str(r#"{"id": 12, "owner": "abc"}"#).unwrap();
        assert_eq!(row.id, "12");
        assert_eq!(row.owner.as_deref(), Some("abc"));

        let row: Row = serde_json::from_str(r#"{"id": "c-1", "owner": null}"#).unwrap();
        assert_eq!(row.id, "c-1");
        assert!(row.owner.is_none());
    }

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "utc_timestamp")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_timestamps_with_and_without_offset() {
        let expected = "2025-03-01T10:30:00Z".parse::<DateTime<Utc>>().unwrap();

        for raw in ["2025-03-01T10:30:00Z", "2025-03-01T12:30:00+02:00", "2025-03-01T10:30:00"] {
            let row: Stamped = serde_json::from_value(serde_json::json!({ "at": raw })).unwrap();
            assert_eq!(row.at, expected, "{}", raw);
        }

        let row: Stamped = serde_json::from_str(r#"{"at": "2025-03-01T10:30:00.1234567"}"#).unwrap();
        assert_eq!(row.at.timestamp(), expected.timestamp());
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert!(serde_json::from_str::<Stamped>(r#"{"at": "yesterday"}"#).is_err());
    }

    #[test]
    fn test_id_rejects_objects() {
        let parsed = serde_json::from_str::<Row>(r#"{"id": {"nested": true}}"#);
        assert!(parsed.is_err());
    }
}
