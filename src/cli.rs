// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command-line interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "zwiftpower-tracker")]
#[command(version, about = "Rolling ZwiftPower race statistics for a club", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output file name (CSV); stdout when neither this nor a spreadsheet is set
    #[arg(long, short = 'f', global = true)]
    pub filename: Option<PathBuf>,

    /// Google Sheets spreadsheet ID
    #[arg(long, short = 's', global = true)]
    pub spreadsheet: Option<String>,

    /// Google Sheets sheet name
    #[arg(long, short = 'n', global = true)]
    pub sheetname: Option<String>,

    /// Restrict to this number of riders. 0 means no limit
    #[arg(long, short = 'l', global = true)]
    pub limit: Option<usize>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import data for every rider in a club (default 2740, Team CRYO-GEN)
    Club { id: Option<u64> },

    /// Import data for a single rider and print the row
    Rider { id: Option<u64> },

    /// Run as an HTTP service exposing /trigger
    Serve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// Layer flags given on the command line over the environment config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(filename) = &self.filename {
            config.filename = Some(filename.clone());
        }
        if let Some(spreadsheet) = &self.spreadsheet {
            config.spreadsheet_id = Some(spreadsheet.clone());
        }
        if let Some(sheet) = &self.sheetname {
            config.spreadsheet_sheet = sheet.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
    }

    /// Apply the flags, then validate the result.
    ///
    /// `rider` always prints its single row to stdout, so the output settings
    /// are not checked for it.
    pub fn configure(&self, config: &mut Config) -> Result<(), ConfigError> {
        self.apply(config);
        match self.command {
            Some(Commands::Rider { .. }) => Ok(()),
            _ => config.validate(),
        }
    }
}
