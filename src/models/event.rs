// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ZwiftPower event records, as delivered upstream and after decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Substring of the event kind tag that marks a race.
pub const RACE_MARKER: &str = "RACE";

/// One result record from `cache3/profile/{zwid}_all.json`.
///
/// Numeric fields are kept as raw JSON because upstream mixes encodings
/// (`["2.7", 0]`, `[2.7, 1]`, `""`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    /// Event kind tag, e.g. `"TYPE_RACE TYPE_RACE "` or `"TYPE_RIDE"`
    #[serde(rename = "f_t", default)]
    pub kind: String,
    /// Epoch seconds; empty string or absent for some event types
    #[serde(default)]
    pub event_date: Value,
    #[serde(default)]
    pub event_title: String,
    #[serde(default)]
    pub avg_wkg: Value,
    #[serde(default)]
    pub wkg_ftp: Value,
}

/// Body of the rider profile endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub data: Vec<RawEvent>,
}

/// A rider listed on a club's roster.
#[derive(Debug, Clone, Deserialize)]
pub struct ClubMember {
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "deserialize_zwid")]
    pub zwid: u64,
}

/// Body of the `team_riders` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamRidersResponse {
    #[serde(default)]
    pub data: Vec<ClubMember>,
}

fn deserialize_zwid<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| serde::de::Error::custom(format!("invalid zwid: {}", value)))
}

/// A numeric field that was neither a JSON number nor a numeric string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("field {field} is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },

    #[error("field {field} is an empty list")]
    Empty { field: &'static str },
}

/// Decode a number that upstream wraps in a list and may encode as a string.
///
/// The first list element (or a bare scalar) is tried as a native JSON number,
/// then as a numeric string.
pub fn decode_wrapped_number(field: &'static str, value: &Value) -> Result<f64, DecodeError> {
    let inner = match value {
        Value::Array(items) => items.first().ok_or(DecodeError::Empty { field })?,
        other => other,
    };

    if let Some(n) = inner.as_f64() {
        return Ok(n);
    }

    inner
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .ok_or_else(|| DecodeError::NotNumeric {
            field,
            value: inner.to_string(),
        })
}

/// Parse an event timestamp. Anything that isn't an epoch-seconds integer
/// means "no date".
fn decode_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    DateTime::from_timestamp(secs, 0)
}

/// A decoded event, read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub kind: String,
    pub date: Option<DateTime<Utc>>,
    pub title: String,
    pub avg_wkg: f64,
    pub wkg_ftp: f64,
}

impl EventRecord {
    /// Whether the kind tag marks this event as a race (case-sensitive).
    pub fn is_race(&self) -> bool {
        self.kind.contains(RACE_MARKER)
    }
}

impl TryFrom<RawEvent> for EventRecord {
    type Error = DecodeError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            avg_wkg: decode_wrapped_number("avg_wkg", &raw.avg_wkg)?,
            wkg_ftp: decode_wrapped_number("wkg_ftp", &raw.wkg_ftp)?,
            date: decode_timestamp(&raw.event_date),
            kind: raw.kind,
            title: raw.event_title,
        })
    }
}
