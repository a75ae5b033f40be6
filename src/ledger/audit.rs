//! Append-only audit log of ledger mutations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The kind of mutation an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A person was added or replaced.
    PersonUpserted,
    /// A payment rule was added or replaced.
    RuleUpserted,
    /// A shift was scheduled or changed.
    ShiftUpserted,
    /// A shift was removed.
    ShiftRemoved,
    /// A clock entry was recorded.
    TimeEntryRecorded,
    /// Hours were overridden.
    HourOverrideSet,
    /// An hour override was removed.
    HourOverrideCleared,
    /// An adjustment was added.
    AdjustmentAdded,
    /// An adjustment was removed.
    AdjustmentRemoved,
    /// A payout status was recorded.
    PaymentStatusSet,
    /// A day was closed.
    DayClosed,
    /// A closed day was reopened.
    DayReopened,
}

/// One successful mutation of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Strictly increasing position in the log, starting at 1.
    pub sequence: u64,
    /// When the mutation was applied.
    pub at: DateTime<Utc>,
    /// Who applied it.
    pub actor: String,
    /// What was done.
    pub action: AuditAction,
    /// The affected day, for day-scoped mutations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Action-specific detail, e.g. the ids and values involved.
    pub details: serde_json::Value,
}
