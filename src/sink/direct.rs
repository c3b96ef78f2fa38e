// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pass-through CSV sink for files and stdout.

use async_trait::async_trait;
use std::io::Write;

use super::{RowSink, SinkError};

/// Writes each row as CSV as soon as it arrives. `flush` has nothing to do.
pub struct DirectSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write + Send> DirectSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().flexible(true).from_writer(inner),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

#[async_trait]
impl<W: Write + Send> RowSink for DirectSink<W> {
    async fn write_row(&mut self, row: Vec<String>) -> Result<(), SinkError> {
        self.writer.write_record(&row)?;
        self.writer.flush()?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "direct"
    }
}
