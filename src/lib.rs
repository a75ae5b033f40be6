//! Daily Payment Engine
//!
//! This crate turns a tenant's roster, schedule, clock entries and payment
//! rules into per-person daily payments, a PIX payout summary and a staffing
//! coverage report. Closed days are locked behind snapshots that can only be
//! changed after an audited reopen.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
