// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Club import workflow.
//!
//! For each rider on the roster, in order:
//! 1. Fetch their event history from ZwiftPower
//! 2. Aggregate it into a summary
//! 3. Render the summary as a row and hand it to the sink
//!
//! The first failing rider stops the run. The sink is flushed either way.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::summary::{AthleteSummary, RiderIdentity};
use crate::services::aggregate::aggregate_raw;
use crate::services::zwiftpower::ZwiftPowerClient;
use crate::sink::RowSink;

/// Imports a club's riders into a row sink.
#[derive(Clone)]
pub struct RosterImporter {
    client: ZwiftPowerClient,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterReport {
    pub club_id: u64,
    pub roster_size: usize,
    pub rows_written: usize,
    pub limited: bool,
}

impl RosterImporter {
    pub fn new(client: ZwiftPowerClient) -> Self {
        Self { client }
    }

    /// Summarize a single rider. The name is not part of the profile data.
    pub async fn import_rider(&self, rider: RiderIdentity, now: DateTime<Utc>) -> Result<AthleteSummary> {
        let zwid = rider.zwid;
        let history = self.client.rider_history(zwid).await?;
        let events = history.len();

        let summary = aggregate_raw(rider, history, now)
            .map_err(|source| AppError::Decode { zwid, source })?;

        tracing::debug!(
            zwid,
            events,
            rides = summary.rides,
            races = summary.races,
            "Aggregated rider history"
        );
        Ok(summary)
    }

    /// Import every rider in `club_id` (at most `limit` if non-zero).
    pub async fn run(
        &self,
        club_id: u64,
        sink: &mut dyn RowSink,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<RosterReport> {
        tracing::info!(club_id, limit, sink = sink.sink_type(), "Starting club import");

        let outcome = self.write_riders(club_id, sink, limit, now).await;

        tracing::debug!("Flushing sink");
        let flushed = sink.flush().await;

        let report = outcome?;
        flushed?;

        tracing::info!(
            club_id,
            rows = report.rows_written,
            roster = report.roster_size,
            "Club import complete"
        );
        Ok(report)
    }

    async fn write_riders(
        &self,
        club_id: u64,
        sink: &mut dyn RowSink,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<RosterReport> {
        let roster = self.client.team_riders(club_id).await?;
        let mut report = RosterReport {
            club_id,
            roster_size: roster.len(),
            rows_written: 0,
            limited: false,
        };

        for member in roster {
            if limit > 0 && report.rows_written >= limit {
                tracing::info!(limit, "Limiting output");
                report.limited = true;
                break;
            }

            let rider = RiderIdentity {
                name: member.name,
                zwid: member.zwid,
            };
            let summary = self.import_rider(rider, now).await.inspect_err(|e| {
                tracing::error!(zwid = member.zwid, error = %e, "Failed to load rider data");
            })?;

            sink.write_row(summary.to_row(now).into_fields()).await?;
            report.rows_written += 1;
        }

        Ok(report)
    }
}
