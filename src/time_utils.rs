// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Datelike, Duration, Utc};

/// Format a UTC timestamp as `YYYY-MM-DD`.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a UTC timestamp for the spreadsheet "Last updated" note,
/// e.g. `2026-October-16`.
pub fn format_note_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%B-%d").to_string()
}

/// Describe how long ago `latest` was, relative to `now`.
///
/// Uses calendar months (wrapping December to January) unless more than
/// 365 days have elapsed.
pub fn months_ago_phrase(latest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(latest) = latest else {
        return "No latest event".to_string();
    };

    if now - latest > Duration::days(365) {
        return "Over a year ago".to_string();
    }

    let mut month_diff = now.month() as i32 - latest.month() as i32;
    if month_diff < 0 {
        month_diff += 12;
    }

    match month_diff {
        0 => "This month".to_string(),
        1 => "Last month".to_string(),
        n => format!("{} months ago", n),
    }
}
