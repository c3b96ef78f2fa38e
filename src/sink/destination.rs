// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Range-addressed destination used by the batching sink.

use async_trait::async_trait;
use std::fmt;

/// A single cell, 1-based row and column letter (`A1` is the top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: u32,
    pub column: char,
}

impl CellRef {
    /// Zero-based column index, as the Sheets grid API expects.
    pub fn column_index(&self) -> u32 {
        column_index(self.column)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// A rectangular range on a named sheet, in A1 notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: String,
    pub start_row: u32,
    pub end_row: u32,
    pub first_column: char,
    pub last_column: char,
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.sheet.is_empty() {
            write!(f, "{}!", self.sheet)?;
        }
        write!(
            f,
            "{}{}:{}{}",
            self.first_column, self.start_row, self.last_column, self.end_row
        )
    }
}

/// Zero-based index of a single-letter column.
pub fn column_index(column: char) -> u32 {
    (column.to_ascii_uppercase() as u32).saturating_sub('A' as u32)
}

/// Errors reported by a destination call.
#[derive(Debug, thiserror::Error)]
pub enum DestinationError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),
}

/// Where batched rows end up. Each call is one blocking round trip.
#[async_trait]
pub trait Destination: Send {
    /// Overwrite `range` with `rows`.
    async fn write_range(
        &mut self,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), DestinationError>;

    /// Clear the values in `range`, leaving formatting intact.
    async fn clear_range(&mut self, range: &CellRange) -> Result<(), DestinationError>;

    /// Attach a freeform note to one cell.
    async fn set_note(
        &mut self,
        sheet: &str,
        cell: CellRef,
        note: &str,
    ) -> Result<(), DestinationError>;
}
