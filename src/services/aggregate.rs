// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rolling performance statistics from a rider's event history.
//!
//! The aggregation is a single fold over the events. Windows are measured
//! against the caller-supplied `now`, so the same history yields different
//! results on different days.

use chrono::{DateTime, Utc};

use crate::models::event::{DecodeError, EventRecord, RawEvent};
use crate::models::summary::{AthleteSummary, LatestEvent, LatestRace, RiderIdentity};

pub const WINDOW_30: i64 = 30;
pub const WINDOW_60: i64 = 60;
pub const WINDOW_90: i64 = 90;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Whole days elapsed between an event and `now`, rounded down.
pub fn days_since(event: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - event).num_seconds().div_euclid(SECS_PER_DAY)
}

/// Aggregate an already-decoded history.
pub fn aggregate(rider: RiderIdentity, history: &[EventRecord], now: DateTime<Utc>) -> AthleteSummary {
    let acc = history
        .iter()
        .fold(Accumulator::default(), |acc, event| acc.step(event, now));

    AthleteSummary {
        rider,
        rides: acc.rides,
        races: acc.races,
        races_30: acc.races_30,
        races_90: acc.races_90,
        ftp_30: acc.ftp_30,
        ftp_60: acc.ftp_60,
        ftp_90: acc.ftp_90,
        latest_event: acc.latest_event,
        latest_race: acc.latest_race,
    }
}

/// Decode every raw record, then aggregate.
///
/// Decoding is all-or-nothing: one bad numeric field fails the whole rider.
pub fn aggregate_raw(
    rider: RiderIdentity,
    raw: Vec<RawEvent>,
    now: DateTime<Utc>,
) -> Result<AthleteSummary, DecodeError> {
    let history = raw
        .into_iter()
        .map(EventRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(aggregate(rider, &history, now))
}

#[derive(Debug, Default)]
struct Accumulator {
    rides: u32,
    races: u32,
    races_30: u32,
    races_90: u32,
    ftp_30: f64,
    ftp_60: f64,
    ftp_90: f64,
    latest_event: Option<LatestEvent>,
    latest_race: Option<LatestRace>,
}

impl Accumulator {
    fn step(mut self, event: &EventRecord, now: DateTime<Utc>) -> Self {
        let is_race = event.is_race();

        self.rides += 1;
        if is_race {
            self.races += 1;
        }

        // Undated events only count toward the lifetime totals.
        let Some(date) = event.date else {
            return self;
        };

        let days_ago = days_since(date, now);
        if days_ago <= WINDOW_90 {
            self.ftp_90 = self.ftp_90.max(event.wkg_ftp);
            if is_race {
                self.races_90 += 1;
            }
        }
        if days_ago <= WINDOW_60 {
            self.ftp_60 = self.ftp_60.max(event.wkg_ftp);
        }
        if days_ago <= WINDOW_30 {
            self.ftp_30 = self.ftp_30.max(event.wkg_ftp);
            if is_race {
                self.races_30 += 1;
            }
        }

        // Strict comparison: ties keep the first event seen.
        if self.latest_event.as_ref().is_none_or(|e| date > e.date) {
            self.latest_event = Some(LatestEvent {
                title: event.title.clone(),
                date,
            });
        }

        if is_race && self.latest_race.as_ref().is_none_or(|r| date > r.date) {
            self.latest_race = Some(LatestRace {
                title: event.title.clone(),
                date,
                avg_wkg: event.avg_wkg,
                wkg_ftp: event.wkg_ftp,
            });
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_days_since_rounds_down() {
        let now = now();
        assert_eq!(days_since(now, now), 0);
        assert_eq!(days_since(now - Duration::hours(23), now), 0);
        assert_eq!(days_since(now - Duration::days(30), now), 30);
        assert_eq!(
            days_since(now - Duration::days(30) - Duration::hours(23), now),
            30
        );
        assert_eq!(days_since(now - Duration::days(31), now), 31);
    }

    #[test]
    fn test_future_events_fall_inside_windows() {
        let now = now();
        assert!(days_since(now + Duration::hours(2), now) <= WINDOW_30);
    }
}
