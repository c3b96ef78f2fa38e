// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers for service mode.

use crate::error::{AppError, Result};
use crate::sink::open_sink;
use crate::AppState;
use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

#[derive(Debug, Deserialize)]
pub struct TriggerParams {
    pub club: Option<String>,
}

/// Run a club import to the configured output, one run at a time.
async fn trigger(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TriggerParams>,
) -> Result<String> {
    let club_id = match params.club.as_deref() {
        None | Some("") => state.config.club_id,
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid club ID: {}", raw)))?,
    };

    let _run = match state.run_lock.try_lock() {
        Ok(guard) => guard,
        Err(_) => {
            tracing::info!(club_id, "Waiting for the previous import to finish");
            state.run_lock.lock().await
        }
    };

    let now = chrono::Utc::now();
    let mut sink = open_sink(&state.config, now).await?;
    let report = state
        .importer
        .run(club_id, sink.as_mut(), state.config.limit, now)
        .await?;

    tracing::info!(club_id, rows = report.rows_written, "Triggered import finished");
    Ok(format!("Reading data for {}\n", club_id))
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/trigger", get(trigger))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
