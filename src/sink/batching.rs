// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Batching sink: buffers rows and writes them to a [`Destination`] in bulk.
//!
//! Row 1 holds the header and is never written. The cursor advances by the
//! batch length after every flush attempt, including failed ones, so a failed
//! batch is dropped rather than retried.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::destination::{CellRange, CellRef, Destination};
use super::{RowSink, SinkError};
use crate::models::summary::ROW_WIDTH;
use crate::time_utils::format_note_date;

/// Write to the destination every time this many rows are buffered.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// First row below the header.
pub const FIRST_DATA_ROW: u32 = 2;

/// Rows cleared below the header before a run starts.
pub const CLEAR_ROWS: u32 = 150;

pub const FIRST_COLUMN: char = 'A';

/// Fixed to the widest possible row, not derived from the data.
pub const LAST_COLUMN: char = (b'A' + ROW_WIDTH as u8 - 1) as char;

pub struct BatchingSink<D> {
    destination: D,
    sheet: String,
    batch_size: usize,
    buffer: Vec<Vec<String>>,
    next_row: u32,
}

impl<D: Destination> BatchingSink<D> {
    pub fn new(destination: D, sheet: impl Into<String>, batch_size: usize) -> Self {
        Self {
            destination,
            sheet: sheet.into(),
            batch_size: batch_size.max(1),
            buffer: Vec::new(),
            next_row: FIRST_DATA_ROW,
        }
    }

    /// Clear last run's rows and stamp the header cell with today's date.
    ///
    /// Both calls are attempted; the first failure is returned.
    pub async fn prepare(&mut self, now: DateTime<Utc>) -> Result<(), SinkError> {
        let clear = CellRange {
            sheet: self.sheet.clone(),
            start_row: FIRST_DATA_ROW,
            end_row: CLEAR_ROWS,
            first_column: FIRST_COLUMN,
            last_column: LAST_COLUMN,
        };
        let cleared = self.destination.clear_range(&clear).await;
        if let Err(e) = &cleared {
            tracing::warn!(range = %clear, error = %e, "Failed to clear spreadsheet values");
        }

        let note = format!("Last updated: {}", format_note_date(now));
        let cell = CellRef {
            row: 1,
            column: FIRST_COLUMN,
        };
        let noted = self.destination.set_note(&self.sheet, cell, &note).await;
        if let Err(e) = &noted {
            tracing::warn!(error = %e, "Failed to add spreadsheet note");
        }

        cleared?;
        noted?;
        Ok(())
    }

    /// Row the next flush will start at.
    pub fn next_row(&self) -> u32 {
        self.next_row
    }

    /// Number of rows waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    fn pending_range(&self) -> CellRange {
        CellRange {
            sheet: self.sheet.clone(),
            start_row: self.next_row,
            end_row: self.next_row + self.buffer.len() as u32,
            first_column: FIRST_COLUMN,
            last_column: LAST_COLUMN,
        }
    }
}

#[async_trait]
impl<D: Destination> RowSink for BatchingSink<D> {
    async fn write_row(&mut self, row: Vec<String>) -> Result<(), SinkError> {
        tracing::debug!(
            rider = row.first().map(String::as_str).unwrap_or_default(),
            fields = row.len(),
            "Buffering spreadsheet row"
        );
        self.buffer.push(row);

        if self.buffer.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let range = self.pending_range();
        tracing::info!(range = %range, rows = self.buffer.len(), "Writing batch to spreadsheet");

        let result = self.destination.write_range(&range, &self.buffer).await;

        // Reset regardless of outcome: a failed batch is not retried.
        self.next_row += self.buffer.len() as u32;
        self.buffer.clear();

        result.map_err(|e| {
            tracing::error!(range = %range, error = %e, "Spreadsheet batch write failed");
            SinkError::Destination(e)
        })
    }

    fn sink_type(&self) -> &'static str {
        "batching"
    }
}
