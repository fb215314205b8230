//! Serde helpers for backend timestamps.
//!
//! The backend serializes `datetime` values with `isoformat()`, which yields
//! RFC 3339 for timezone-aware values and a bare `YYYY-MM-DDTHH:MM:SS[.ffffff]`
//! for naive ones. Naive values are read as UTC. Timestamps are always written
//! back as RFC 3339.
//!
//! Use with `#[serde(with = "crate::timestamp")]`, or
//! `#[serde(default, with = "crate::timestamp::option")]` for optional fields.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::ModelError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend timestamp.
///
/// # Examples
///
/// ```
/// use triage_models::timestamp::parse;
///
/// let aware = parse("2024-03-01T10:00:00+01:00").unwrap();
/// let naive = parse("2024-03-01T09:00:00").unwrap();
/// assert_eq!(aware, naive);
/// ```
pub fn parse(value: &str) -> Result<DateTime<Utc>, ModelError> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(value) {
        return Ok(aware.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ModelError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Serialize a timestamp as RFC 3339.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339())
}

/// Deserialize an RFC 3339 or naive ISO-8601 timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// Same as the parent module, for `Option<DateTime<Utc>>` fields.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize an optional timestamp (`null` when absent).
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_some(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional timestamp; `null` maps to `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|value| super::parse(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}
