//! Day closure and payment status models.
//!
//! A [`DayClosure`] snapshots a day's computed payment lines for a scope and
//! locks that scope against edits until it is reopened.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::PaymentLine;

/// The part of a tenant a day computation or closure covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayScope {
    /// Every unit.
    All,
    /// A single unit.
    Unit(String),
}

impl DayScope {
    /// The narrowest scope that contains a person or record at `unit_id`.
    ///
    /// Records without a unit can only be contained by [`DayScope::All`].
    pub fn for_unit(unit_id: Option<&str>) -> Self {
        match unit_id {
            Some(unit) => DayScope::Unit(unit.to_string()),
            None => DayScope::All,
        }
    }

    /// Returns true if a record at `unit_id` falls inside this scope.
    pub fn includes_unit(&self, unit_id: Option<&str>) -> bool {
        match self {
            DayScope::All => true,
            DayScope::Unit(unit) => unit_id == Some(unit.as_str()),
        }
    }

    /// Returns true if this scope contains every record of `other`.
    pub fn covers(&self, other: &DayScope) -> bool {
        matches!(self, DayScope::All) || self == other
    }
}

impl fmt::Display for DayScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayScope::All => write!(f, "all"),
            DayScope::Unit(unit) => write!(f, "unit:{}", unit),
        }
    }
}

/// The audit record of a reopened closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reopening {
    /// When the day was reopened.
    pub reopened_at: DateTime<Utc>,
    /// Who reopened it.
    pub reopened_by: String,
    /// Why it was reopened.
    pub reason: String,
}

/// A snapshot-and-lock of one day for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayClosure {
    /// Unique identifier for the closure.
    pub id: String,
    /// The closed date.
    pub date: NaiveDate,
    /// The closed scope.
    pub scope: DayScope,
    /// When the day was closed.
    pub closed_at: DateTime<Utc>,
    /// Who closed it.
    pub closed_by: String,
    /// The payment lines as computed at closing time.
    pub snapshot: Vec<PaymentLine>,
    /// Set once the closure has been reopened.
    #[serde(default)]
    pub reopening: Option<Reopening>,
}

impl DayClosure {
    /// Returns true while the closure locks its scope.
    pub fn is_active(&self) -> bool {
        self.reopening.is_none()
    }
}

/// Where a person's payout for a day stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing has happened yet.
    #[default]
    Pending,
    /// Queued for payout.
    Scheduled,
    /// Paid out.
    Paid,
    /// Will not be paid.
    Cancelled,
}

/// The recorded payment status for one person on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusRecord {
    /// The person.
    pub person_id: String,
    /// The day.
    pub date: NaiveDate,
    /// The status.
    pub status: PaymentStatus,
    /// When the payout happened, for `paid`.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// The PIX transaction id or other payout reference.
    #[serde(default)]
    pub reference: Option<String>,
}
