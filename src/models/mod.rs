// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod event;
pub mod summary;

pub use event::{ClubMember, DecodeError, EventRecord, RawEvent};
pub use summary::{AthleteSummary, LatestEvent, LatestRace, OutputRow, RiderIdentity};
