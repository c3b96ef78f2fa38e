// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-rider summary produced by the aggregator, and its tabular rendering.

use chrono::{DateTime, Utc};

use crate::time_utils::{format_date, months_ago_phrase};

/// Number of fields in an [`OutputRow`].
pub const ROW_WIDTH: usize = 14;

/// Build the public ZwiftPower profile URL for a rider.
pub fn profile_url(zwid: u64) -> String {
    format!("https://www.zwiftpower.com/profile.php?z={}", zwid)
}

/// Identity fields supplied by the caller and carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiderIdentity {
    pub name: String,
    pub zwid: u64,
}

/// Most recent event of any kind.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestEvent {
    pub title: String,
    pub date: DateTime<Utc>,
}

/// Most recent race, with the ratios recorded in that race.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestRace {
    pub title: String,
    pub date: DateTime<Utc>,
    pub avg_wkg: f64,
    pub wkg_ftp: f64,
}

/// Rolling performance statistics for one rider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AthleteSummary {
    pub rider: RiderIdentity,

    // ─── Counts ──────────────────────────────────────────────────
    pub rides: u32,
    pub races: u32,
    pub races_30: u32,
    pub races_90: u32,

    // ─── Best wkg_ftp per trailing window ────────────────────────
    pub ftp_30: f64,
    pub ftp_60: f64,
    pub ftp_90: f64,

    // ─── Recency ─────────────────────────────────────────────────
    pub latest_event: Option<LatestEvent>,
    pub latest_race: Option<LatestRace>,
}

impl AthleteSummary {
    /// Human-readable time since the latest event.
    pub fn months_ago(&self, now: DateTime<Utc>) -> String {
        months_ago_phrase(self.latest_event.as_ref().map(|e| e.date), now)
    }

    /// Render as the fixed 14-field output row.
    pub fn to_row(&self, now: DateTime<Utc>) -> OutputRow {
        let latest_event = self.latest_event.as_ref();
        let latest_race = self.latest_race.as_ref();

        OutputRow([
            self.rider.name.clone(),
            self.rider.zwid.to_string(),
            latest_event.map(|e| format_date(e.date)).unwrap_or_default(),
            self.months_ago(now),
            latest_event.map(|e| e.title.clone()).unwrap_or_default(),
            self.rides.to_string(),
            profile_url(self.rider.zwid),
            format_ratio(self.ftp_30),
            format_ratio(self.ftp_90),
            self.races_30.to_string(),
            self.races_90.to_string(),
            self.races.to_string(),
            latest_race.map(|r| r.title.clone()).unwrap_or_default(),
            latest_race.map(|r| format_date(r.date)).unwrap_or_default(),
        ])
    }
}

/// W/kg ratios are shown with exactly one decimal place.
fn format_ratio(value: f64) -> String {
    format!("{:.1}", value)
}

/// One rider's row, in the column order the spreadsheet expects.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow([String; ROW_WIDTH]);

impl OutputRow {
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<String> {
        self.0.into()
    }
}
