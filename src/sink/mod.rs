// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Row sinks: where rendered rider rows go.
//!
//! Two implementations share the [`RowSink`] capability:
//! - [`DirectSink`] writes CSV straight through (file or stdout)
//! - [`BatchingSink`] buffers rows and bulk-writes them to a spreadsheet
//!
//! The variant is picked from configuration, never from the writer's type.
//! Sinks are owned by a single run and do no locking of their own.

pub mod batching;
pub mod destination;
pub mod direct;
pub mod sheets;

pub use batching::BatchingSink;
pub use destination::{CellRange, CellRef, Destination, DestinationError};
pub use direct::DirectSink;
pub use sheets::SheetsDestination;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::config::Config;

/// Errors from writing or flushing rows.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Destination error: {0}")]
    Destination(#[from] DestinationError),
}

/// Accepts rendered rows and delivers them somewhere.
#[async_trait]
pub trait RowSink: Send {
    /// Accept one row. May trigger a write to the destination.
    async fn write_row(&mut self, row: Vec<String>) -> Result<(), SinkError>;

    /// Deliver anything still pending. A no-op when nothing is buffered.
    async fn flush(&mut self) -> Result<(), SinkError>;

    /// Sink kind, for logging.
    fn sink_type(&self) -> &'static str;
}

/// Where a run's rows should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
    Spreadsheet { id: String, sheet: String },
}

impl OutputTarget {
    /// Spreadsheet wins over file; with neither configured, write to stdout.
    pub fn from_config(config: &Config) -> Self {
        if let Some(id) = &config.spreadsheet_id {
            return OutputTarget::Spreadsheet {
                id: id.clone(),
                sheet: config.spreadsheet_sheet.clone(),
            };
        }
        match &config.filename {
            Some(path) => OutputTarget::File(path.clone()),
            None => OutputTarget::Stdout,
        }
    }
}

/// Open the sink for the configured target.
///
/// Spreadsheet sinks are prepared (old rows cleared, header noted) before
/// being returned; a failed preparation is logged and the run continues.
pub async fn open_sink(config: &Config, now: DateTime<Utc>) -> Result<Box<dyn RowSink>, SinkError> {
    match OutputTarget::from_config(config) {
        OutputTarget::Spreadsheet { id, sheet } => {
            tracing::info!(spreadsheet = %id, sheet = %sheet, "Writing to spreadsheet");
            let destination = SheetsDestination::new(
                config.sheets_base_url.clone(),
                id,
                config.google_access_token.clone().unwrap_or_default(),
            );
            let mut sink = BatchingSink::new(destination, sheet, config.batch_size);
            if let Err(e) = sink.prepare(now).await {
                tracing::warn!(error = %e, "Spreadsheet preparation failed, continuing");
            }
            Ok(Box::new(sink))
        }
        OutputTarget::File(path) => {
            tracing::info!(path = %path.display(), "Writing to file");
            let file = std::fs::File::create(&path)?;
            Ok(Box::new(DirectSink::new(file)))
        }
        OutputTarget::Stdout => {
            tracing::info!("Writing to stdout");
            Ok(Box::new(DirectSink::new(std::io::stdout())))
        }
    }
}
