//! The day ledger: every record a tenant's day computations read, the
//! mutations that change them and an append-only audit log.
//!
//! # Example
//!
//! ```no_run
//! use daily_pay_engine::config::ConfigLoader;
//! use daily_pay_engine::ledger::DayLedger;
//! use daily_pay_engine::models::DayScope;
//! use chrono::NaiveDate;
//!
//! let config = ConfigLoader::load("./config/demo").unwrap();
//! let mut ledger = DayLedger::new(config.tenant().id.clone());
//! let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! ledger.close_day(date, DayScope::All, "manager", &config).unwrap();
//! ledger.save_to("./state/ledger.json").unwrap();
//! ```

mod audit;
mod day_ledger;
mod persistence;

pub use audit::{AuditAction, AuditEvent};
pub use day_ledger::DayLedger;
