// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ZwiftPower API client for club rosters and rider event history.
//!
//! Requests are made one at a time with no retries; pacing against upstream
//! rate limits is up to the caller.

use crate::error::AppError;
use crate::models::event::{ClubMember, ProfileResponse, RawEvent, TeamRidersResponse};
use serde::Deserialize;

pub const DEFAULT_ZWIFTPOWER_BASE_URL: &str = "https://www.zwiftpower.com";

/// ZwiftPower API client.
#[derive(Clone)]
pub struct ZwiftPowerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ZwiftPowerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// List the riders in a club.
    pub async fn team_riders(&self, club_id: u64) -> Result<Vec<ClubMember>, AppError> {
        let url = format!("{}/api3.php", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("do", "team_riders".to_string()), ("id", club_id.to_string())])
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let roster: TeamRidersResponse = check_response_json(response).await?;
        tracing::info!(club_id, riders = roster.data.len(), "Fetched club roster");
        Ok(roster.data)
    }

    /// Fetch every recorded event for a rider.
    pub async fn rider_history(&self, zwid: u64) -> Result<Vec<RawEvent>, AppError> {
        // Hitting the profile page first gets the cached JSON refreshed.
        let profile = format!("{}/profile.php", self.base_url);
        if let Err(e) = self
            .http
            .get(&profile)
            .query(&[("z", zwid.to_string())])
            .send()
            .await
        {
            tracing::debug!(zwid, error = %e, "Profile warm-up request failed");
        }

        let url = format!("{}/cache3/profile/{}_all.json", self.base_url, zwid);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let history: ProfileResponse = check_response_json(response).await?;
        if history.data.is_empty() {
            tracing::info!(zwid, "No event data for rider");
        }
        Ok(history.data)
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let url = response.url().to_string();

        if status.as_u16() == 429 {
            tracing::warn!("ZwiftPower rate limit hit (429)");
        }

        return Err(AppError::Upstream(format!(
            "unexpected status {} for {}",
            status, url
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))
}
