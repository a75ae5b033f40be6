//! Request types for the Daily Payment Engine API.
//!
//! This module defines the JSON request bodies and query strings for the
//! stateless `/calculate` endpoint and the ledger's `/days` endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::DayInput;
use crate::models::{
    Adjustment, AdjustmentKind, DayClosure, DayScope, HourOverride, PaymentRule, PaymentStatus,
    PaymentStatusRecord, Person, ScheduledShift, TimeEntry,
};

fn default_actor() -> String {
    "api".to_string()
}

/// Request body for the `/calculate` endpoint.
///
/// Carries every record needed to compute one day without touching the
/// ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The day to compute.
    pub date: NaiveDate,
    /// Restricts the computation to one unit when set.
    #[serde(default)]
    pub unit_id: Option<String>,
    /// The roster.
    pub people: Vec<Person>,
    /// Payment rules; role defaults come from configuration.
    #[serde(default)]
    pub rules: Vec<PaymentRule>,
    /// Scheduled shifts.
    #[serde(default)]
    pub shifts: Vec<ScheduledShift>,
    /// Clock entries.
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
    /// Hour overrides.
    #[serde(default)]
    pub overrides: Vec<HourOverride>,
    /// Adjustments.
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
    /// Day closures.
    #[serde(default)]
    pub closures: Vec<DayClosure>,
    /// Payout statuses.
    #[serde(default)]
    pub payment_statuses: Vec<PaymentStatusRecord>,
}

impl CalculationRequest {
    /// The scope the request asks for.
    pub fn scope(&self) -> DayScope {
        DayScope::for_unit(self.unit_id.as_deref())
    }

    /// Borrows the request as calculation input.
    pub fn input(&self) -> DayInput<'_> {
        DayInput {
            people: &self.people,
            rules: &self.rules,
            shifts: &self.shifts,
            time_entries: &self.time_entries,
            overrides: &self.overrides,
            adjustments: &self.adjustments,
            closures: &self.closures,
            payment_statuses: &self.payment_statuses,
        }
    }
}

/// `?unit=` query for day reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeQuery {
    /// The unit to restrict to.
    pub unit: Option<String>,
}

impl ScopeQuery {
    /// The requested scope.
    pub fn scope(&self) -> DayScope {
        DayScope::for_unit(self.unit.as_deref())
    }
}

/// `?actor=` query for deletions.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorQuery {
    /// Who is making the change.
    #[serde(default = "default_actor")]
    pub actor: String,
}

/// `?date=` query for the audit log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    /// Only events for this day.
    pub date: Option<NaiveDate>,
}

/// Request body for `POST /days/:date/overrides`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourOverrideRequest {
    /// The person whose hours are set.
    pub person_id: String,
    /// The hours that count.
    pub hours: Decimal,
    /// Why the hours were overridden.
    #[serde(default)]
    pub reason: Option<String>,
    /// The manager making the change.
    #[serde(default = "default_actor")]
    pub author: String,
}

impl HourOverrideRequest {
    /// Converts the request into an override for `date`.
    pub fn into_override(self, date: NaiveDate) -> HourOverride {
        HourOverride {
            person_id: self.person_id,
            date,
            hours: self.hours,
            reason: self.reason,
            author: self.author,
        }
    }
}

/// Request body for `POST /days/:date/adjustments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    /// Adjustment id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// The person adjusted; absent for a global adjustment.
    #[serde(default)]
    pub person_id: Option<String>,
    /// The adjustment category.
    pub kind: AdjustmentKind,
    /// The amount.
    pub amount: Decimal,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Who is making the change.
    #[serde(default = "default_actor")]
    pub actor: String,
}

impl AdjustmentRequest {
    /// Converts the request into an adjustment for `date`.
    pub fn into_adjustment(self, date: NaiveDate) -> Adjustment {
        Adjustment {
            id: self
                .id
                .unwrap_or_else(|| format!("adj_{}", Uuid::new_v4().simple())),
            person_id: self.person_id,
            date,
            kind: self.kind,
            amount: self.amount,
            description: self.description,
        }
    }
}

/// Request body for `POST /days/:date/payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusRequest {
    /// The person paid.
    pub person_id: String,
    /// The new status.
    pub status: PaymentStatus,
    /// When the payout happened.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// The PIX transaction id or other reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// Who is making the change.
    #[serde(default = "default_actor")]
    pub actor: String,
}

impl PaymentStatusRequest {
    /// Converts the request into a status record for `date`.
    pub fn into_record(self, date: NaiveDate) -> PaymentStatusRecord {
        PaymentStatusRecord {
            person_id: self.person_id,
            date,
            status: self.status,
            paid_at: self.paid_at,
            reference: self.reference,
        }
    }
}

/// Request body for `POST /days/:date/close`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseDayRequest {
    /// Closes a single unit when set, otherwise every unit.
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Who closes the day.
    #[serde(default = "default_actor")]
    pub actor: String,
}

/// Request body for `POST /days/:date/reopen`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReopenDayRequest {
    /// The unit of the closure to reopen; absent for a whole-day closure.
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Who reopens the day.
    #[serde(default = "default_actor")]
    pub actor: String,
    /// Why the day is reopened.
    pub reason: String,
}
