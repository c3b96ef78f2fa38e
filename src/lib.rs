// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ZwiftPower-Tracker: rolling race statistics for a Zwift club
//!
//! This crate fetches each club member's ZwiftPower event history, derives
//! trailing-window performance statistics, and writes one row per rider to
//! a CSV file, stdout, or a Google Sheets spreadsheet.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod sink;
pub mod time_utils;

use config::Config;
use services::RosterImporter;
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub importer: RosterImporter,
    /// Held for the whole of a run; every run writes the same output.
    pub run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config, importer: RosterImporter) -> Self {
        Self {
            config,
            importer,
            run_lock: Mutex::new(()),
        }
    }
}
