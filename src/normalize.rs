//! Lenient deserializers for admin form payloads.
//!
//! The back office submits whatever its form widgets produce: checkboxes arrive as
//! `"true"`, `"1"` or `"on"`, number inputs as strings, tag inputs as comma separated
//! text. These helpers coerce such values into typed fields before anything reaches
//! the repository. Every helper targets an `Option<T>` field and must be combined with
//! `#[serde(default)]`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{
    Deserialize, Deserializer,
    de::{DeserializeOwned, Error, IntoDeserializer, value::StrDeserializer},
};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

/// Interprets a textual form value as a boolean. Blank input is "not provided".
pub fn parse_bool(raw: &str) -> Result<Option<bool>, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        other => Err(format!("invalid boolean value '{other}'")),
    }
}

/// Interprets a textual form value as a number. Blank input is "not provided".
pub fn parse_number(raw: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Some)
        .ok_or_else(|| format!("invalid numeric value '{trimmed}'"))
}

/// Splits a comma or newline separated string into trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (taken as the end of that day, UTC).
pub fn parse_datetime(raw: &str) -> Result<Option<DateTime<Utc>>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| format!("invalid date '{trimmed}'"))
}

/// Parses a unit enum from its wire name (e.g. `"full-time"`).
pub fn parse_enum<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let de: StrDeserializer<'_, serde::de::value::Error> = raw.trim().into_deserializer();
    T::deserialize(de).ok()
}

/// Blank strings on optional text fields mean "not provided".
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Bool(b)) => Ok(Some(b)),
        Some(Loose::Int(n)) => Ok(Some(n != 0)),
        Some(Loose::Float(n)) => Ok(Some(n != 0.0)),
        Some(Loose::Text(s)) => parse_bool(&s).map_err(D::Error::custom),
        Some(Loose::List(_)) => Err(D::Error::custom("expected a boolean, found a list")),
    }
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Int(n)) => Ok(Some(n as f64)),
        Some(Loose::Float(n)) => Ok(Some(n)),
        Some(Loose::Text(s)) => parse_number(&s).map_err(D::Error::custom),
        Some(Loose::Bool(_)) | Some(Loose::List(_)) => {
            Err(D::Error::custom("expected a number"))
        }
    }
}

pub fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::List(items)) => Ok(Some(
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        )),
        Some(Loose::Text(s)) => Ok(Some(split_list(&s))),
        Some(_) => Err(D::Error::custom("expected a list or a comma separated string")),
    }
}

pub fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_enum(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown variant '{}'", raw.trim()))),
    }
}

pub fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Text(s)) => parse_datetime(&s).map_err(D::Error::custom),
        Some(_) => Err(D::Error::custom("expected a date string")),
    }
}
