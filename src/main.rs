// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ZwiftPower-Tracker command-line entry point.
//!
//! Imports a club's riders (or a single rider) from ZwiftPower and writes one
//! row of rolling statistics per rider, or runs as an HTTP service that does
//! the same on `/trigger`.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zwiftpower_tracker::{
    cli::{Cli, Commands, LogFormat},
    config::{Config, DEFAULT_CLUB_ID, DEFAULT_RIDER_ID},
    models::RiderIdentity,
    sink::{open_sink, DirectSink, RowSink},
    services::{RosterImporter, ZwiftPowerClient},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let mut config = Config::from_env().context("Failed to load configuration")?;
    cli.configure(&mut config).context("Invalid configuration")?;

    let importer = RosterImporter::new(ZwiftPowerClient::new(config.zwiftpower_base_url.clone()));

    match cli.command {
        None => run_club(&config, &importer, DEFAULT_CLUB_ID).await,
        Some(Commands::Club { id }) => {
            run_club(&config, &importer, id.unwrap_or(DEFAULT_CLUB_ID)).await
        }
        Some(Commands::Rider { id }) => {
            let rider = RiderIdentity {
                name: String::new(),
                zwid: id.unwrap_or(DEFAULT_RIDER_ID),
            };
            let now = chrono::Utc::now();
            let summary = importer
                .import_rider(rider, now)
                .await
                .context("Error getting rider")?;

            let mut out = DirectSink::new(std::io::stdout());
            out.write_row(summary.to_row(now).into_fields()).await?;
            Ok(())
        }
        Some(Commands::Serve) => serve(config, importer).await,
    }
}

async fn run_club(config: &Config, importer: &RosterImporter, club_id: u64) -> anyhow::Result<()> {
    let now = chrono::Utc::now();
    let mut sink = open_sink(config, now)
        .await
        .context("Failed to open output")?;

    importer
        .run(club_id, sink.as_mut(), config.limit, now)
        .await
        .with_context(|| format!("Error getting ZwiftPower data for {}", club_id))?;
    Ok(())
}

async fn serve(config: Config, importer: RosterImporter) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(config, importer));
    let app = zwiftpower_tracker::routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize logging on stderr, keeping stdout free for CSV output.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("zwiftpower_tracker=debug,info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
