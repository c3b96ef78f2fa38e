// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Command-line flags in `cli` override these values after loading.

use std::env;
use std::path::PathBuf;

use crate::services::zwiftpower::DEFAULT_ZWIFTPOWER_BASE_URL;
use crate::sink::batching::DEFAULT_BATCH_SIZE;
use crate::sink::sheets::DEFAULT_SHEETS_BASE_URL;

/// Club imported when none is given (Team CRYO-GEN).
pub const DEFAULT_CLUB_ID: u64 = 2740;

/// Rider imported by the `rider` command when none is given.
pub const DEFAULT_RIDER_ID: u64 = 98588;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Output ---
    /// CSV output file; stdout when unset
    pub filename: Option<PathBuf>,
    /// Google Sheets spreadsheet ID (from the sheet's URL)
    pub spreadsheet_id: Option<String>,
    /// Name of the sheet within the spreadsheet
    pub spreadsheet_sheet: String,
    /// OAuth access token for the Sheets API
    pub google_access_token: Option<String>,
    /// Rows buffered per spreadsheet write
    pub batch_size: usize,

    // --- Run ---
    /// Maximum riders per run; 0 means all of them
    pub limit: usize,
    /// Club imported by the HTTP trigger
    pub club_id: u64,

    // --- Service ---
    pub port: u16,
    pub zwiftpower_base_url: String,
    pub sheets_base_url: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            filename: None,
            spreadsheet_id: None,
            spreadsheet_sheet: String::new(),
            google_access_token: None,
            batch_size: DEFAULT_BATCH_SIZE,
            limit: 0,
            club_id: DEFAULT_CLUB_ID,
            port: 8080,
            zwiftpower_base_url: DEFAULT_ZWIFTPOWER_BASE_URL.to_string(),
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only malformed values are rejected here. Combinations are checked by
    /// [`Config::validate`] once command-line flags have been applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            filename: non_empty("FILENAME").map(PathBuf::from),
            spreadsheet_id: non_empty("SPREADSHEET_ID"),
            spreadsheet_sheet: env::var("SPREADSHEET_SHEET").unwrap_or_default(),
            google_access_token: non_empty("GOOGLE_ACCESS_TOKEN").map(|v| v.trim().to_string()),
            batch_size: parse_var("BATCH_SIZE")?.unwrap_or(DEFAULT_BATCH_SIZE),
            limit: parse_var("LIMIT")?.unwrap_or(0),
            club_id: parse_var("CLUB_ID")?.unwrap_or(DEFAULT_CLUB_ID),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            zwiftpower_base_url: non_empty("ZWIFTPOWER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ZWIFTPOWER_BASE_URL.to_string()),
            sheets_base_url: non_empty("SHEETS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_BASE_URL.to_string()),
        })
    }

    /// Check combinations that can't work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spreadsheet_id.is_some() && self.google_access_token.is_none() {
            return Err(ConfigError::Missing("GOOGLE_ACCESS_TOKEN"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid {
                name: "BATCH_SIZE",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match non_empty(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Single test touching the environment, to avoid races between tests.
        env::set_var("LIMIT", "5");
        env::set_var("SPREADSHEET_ID", "");
        env::set_var("BATCH_SIZE", "25");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.limit, 5);
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.spreadsheet_id, None);

        // A spreadsheet without a token loads; validation comes later
        env::set_var("SPREADSHEET_ID", "abc");
        env::remove_var("GOOGLE_ACCESS_TOKEN");
        let config = Config::from_env().expect("Config should load without a token");
        assert_eq!(config.spreadsheet_id.as_deref(), Some("abc"));
        assert!(config.validate().is_err());
        env::remove_var("SPREADSHEET_ID");

        env::set_var("LIMIT", "lots");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid { name: "LIMIT", .. })
        ));

        env::remove_var("LIMIT");
        env::remove_var("BATCH_SIZE");
    }

    #[test]
    fn test_spreadsheet_requires_token() {
        let config = Config {
            spreadsheet_id: Some("abc".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("GOOGLE_ACCESS_TOKEN"))
        ));
    }
}
