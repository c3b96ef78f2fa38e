// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregate;
pub mod roster;
pub mod zwiftpower;

pub use aggregate::{aggregate, aggregate_raw};
pub use roster::{RosterImporter, RosterReport};
pub use zwiftpower::ZwiftPowerClient;
