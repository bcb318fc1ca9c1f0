use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::de::{Error, Unexpected};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepts RFC 3339 timestamps and ISO timestamps without an offset. The ML
/// backend sends the latter, they are read as local time.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value).ok_or_else(|| Error::invalid_value(Unexpected::Str(&value), &"an ISO 8601 timestamp"))
}

pub fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_timestamp(&value)
            .map(Some)
            .ok_or_else(|| Error::invalid_value(Unexpected::Str(&value), &"an ISO 8601 timestamp")),
        None => Ok(None),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS.iter().find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())?;
    // A local time skipped by a DST change has no mapping, read it as UTC instead
    let timestamp = Local
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| naive.and_utc(), |local| local.with_timezone(&Utc));
    Some(timestamp)
}
