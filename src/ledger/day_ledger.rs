//! The in-memory ledger of a tenant's daily payment records.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{self, DayInput, ensure_day_unlocked, ensure_person_unlocked};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Adjustment, DayClosure, DayPaymentContext, DayScope, HourOverride, PaymentRule,
    PaymentStatus, PaymentStatusRecord, Person, Reopening, ScheduledShift, TimeEntry,
};

use super::{AuditAction, AuditEvent};

/// All records for one tenant plus the audit log of every change.
///
/// Every mutation that affects a day's computation is checked against the
/// day-lock gate first; a failed mutation leaves the ledger untouched and
/// logs nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayLedger {
    tenant_id: String,
    #[serde(default)]
    people: Vec<Person>,
    #[serde(default)]
    rules: Vec<PaymentRule>,
    #[serde(default)]
    shifts: Vec<ScheduledShift>,
    #[serde(default)]
    time_entries: Vec<TimeEntry>,
    #[serde(default)]
    overrides: Vec<HourOverride>,
    #[serde(default)]
    adjustments: Vec<Adjustment>,
    #[serde(default)]
    closures: Vec<DayClosure>,
    #[serde(default)]
    payment_statuses: Vec<PaymentStatusRecord>,
    #[serde(default)]
    audit_log: Vec<AuditEvent>,
}

impl DayLedger {
    /// Creates an empty ledger for a tenant.
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            ..Default::default()
        }
    }

    /// Returns the tenant id.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Returns the roster.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Returns the payment rules.
    pub fn rules(&self) -> &[PaymentRule] {
        &self.rules
    }

    /// Returns the scheduled shifts.
    pub fn shifts(&self) -> &[ScheduledShift] {
        &self.shifts
    }

    /// Returns the clock entries.
    pub fn time_entries(&self) -> &[TimeEntry] {
        &self.time_entries
    }

    /// Returns the hour overrides.
    pub fn overrides(&self) -> &[HourOverride] {
        &self.overrides
    }

    /// Returns the adjustments.
    pub fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }

    /// Returns every closure, reopened ones included.
    pub fn closures(&self) -> &[DayClosure] {
        &self.closures
    }

    /// Returns the recorded payment statuses.
    pub fn payment_statuses(&self) -> &[PaymentStatusRecord] {
        &self.payment_statuses
    }

    /// Returns the audit log, oldest first.
    pub fn audit_log(&self) -> &[AuditEvent] {
        &self.audit_log
    }

    /// Returns the audit events for one day.
    pub fn audit_log_for(&self, date: NaiveDate) -> Vec<&AuditEvent> {
        self.audit_log
            .iter()
            .filter(|e| e.date == Some(date))
            .collect()
    }

    /// Borrows the ledger as calculation input.
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

    /// Computes the day from the ledger's records.
    pub fn compute_day(
        &self,
        date: NaiveDate,
        scope: &DayScope,
        config: &ConfigLoader,
    ) -> EngineResult<DayPaymentContext> {
        calculation::compute_day(self.input(), date, scope, config)
    }

    fn record(
        &mut self,
        actor: &str,
        action: AuditAction,
        date: Option<NaiveDate>,
        details: serde_json::Value,
    ) {
        let sequence = self.audit_log.last().map_or(1, |e| e.sequence + 1);
        info!(
            tenant_id = %self.tenant_id,
            sequence,
            actor,
            action = ?action,
            date = ?date,
            "Ledger mutation applied"
        );
        self.audit_log.push(AuditEvent {
            sequence,
            at: Utc::now(),
            actor: actor.to_string(),
            action,
            date,
            details,
        });
    }

    fn person(&self, person_id: &str) -> EngineResult<&Person> {
        self.people
            .iter()
            .find(|p| p.id == person_id)
            .ok_or_else(|| EngineError::PersonNotFound {
                person_id: person_id.to_string(),
            })
    }

    /// Checks the lock on a person's line for `date`.
    ///
    /// Lines are scoped by the person's unit, so shifts, entries and
    /// overrides are gated on the person whatever unit the shift is at.
    fn gate_person(&self, date: NaiveDate, person_id: &str) -> EngineResult<()> {
        let scope = DayScope::for_unit(self.person(person_id)?.unit_id.as_deref());
        self.gated(ensure_person_unlocked(&self.closures, date, person_id, &scope))
    }

    fn gate_adjustment(&self, adjustment: &Adjustment) -> EngineResult<()> {
        match &adjustment.person_id {
            Some(person_id) => self.gate_person(adjustment.date, person_id),
            None => self.gated(ensure_day_unlocked(&self.closures, adjustment.date)),
        }
    }

    fn gated(&self, result: EngineResult<()>) -> EngineResult<()> {
        result.inspect_err(|err| {
            warn!(tenant_id = %self.tenant_id, error = %err, "Mutation rejected by day lock");
        })
    }

    /// Adds or replaces a person. Not day-scoped, so never locked.
    pub fn upsert_person(&mut self, person: Person, actor: &str) -> EngineResult<()> {
        let details = serde_json::json!({ "person_id": person.id, "role_id": person.role_id });
        match self.people.iter_mut().find(|p| p.id == person.id) {
            Some(existing) => *existing = person,
            None => self.people.push(person),
        }
        self.record(actor, AuditAction::PersonUpserted, None, details);
        Ok(())
    }

    /// Adds or replaces a payment rule. Not day-scoped, so never locked.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPaymentRule` for a negative amount.
    pub fn upsert_rule(&mut self, rule: PaymentRule, actor: &str) -> EngineResult<()> {
        if rule.amount < Decimal::ZERO {
            return Err(EngineError::InvalidPaymentRule {
                rule_id: rule.id,
                message: "amount cannot be negative".to_string(),
            });
        }
        let details = serde_json::json!({
            "rule_id": rule.id,
            "kind": rule.kind,
            "amount": rule.amount.to_string()
        });
        match self.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self.record(actor, AuditAction::RuleUpserted, None, details);
        Ok(())
    }

    /// Adds or replaces a scheduled shift.
    ///
    /// When a shift is moved, both its old and new day must be open.
    ///
    /// # Errors
    ///
    /// - `PersonNotFound` for an unknown person
    /// - `InvalidShift` when the unpaid break is longer than the shift
    /// - `DayLocked` when either day is closed
    pub fn upsert_shift(&mut self, shift: ScheduledShift, actor: &str) -> EngineResult<()> {
        self.person(&shift.person_id)?;
        if i64::from(shift.unpaid_break_minutes) > shift.span_minutes() {
            return Err(EngineError::InvalidShift {
                shift_id: shift.id,
                message: "unpaid break is longer than the shift".to_string(),
            });
        }
        if let Some(previous) = self.shifts.iter().find(|s| s.id == shift.id) {
            self.gate_person(previous.date, &previous.person_id)?;
        }
        self.gate_person(shift.date, &shift.person_id)?;

        let date = shift.date;
        let details = serde_json::json!({
            "shift_id": shift.id,
            "person_id": shift.person_id,
            "start": shift.start.to_string(),
            "end": shift.end.to_string(),
            "hours": shift.scheduled_hours().normalize().to_string()
        });
        match self.shifts.iter_mut().find(|s| s.id == shift.id) {
            Some(existing) => *existing = shift,
            None => self.shifts.push(shift),
        }
        self.record(actor, AuditAction::ShiftUpserted, Some(date), details);
        Ok(())
    }

    /// Removes a scheduled shift.
    pub fn remove_shift(&mut self, shift_id: &str, actor: &str) -> EngineResult<()> {
        let index = self
            .shifts
            .iter()
            .position(|s| s.id == shift_id)
            .ok_or_else(|| EngineError::RecordNotFound {
                kind: "shift".to_string(),
                id: shift_id.to_string(),
            })?;
        let shift = &self.shifts[index];
        self.gate_person(shift.date, &shift.person_id)?;

        let shift = self.shifts.remove(index);
        self.record(
            actor,
            AuditAction::ShiftRemoved,
            Some(shift.date),
            serde_json::json!({ "shift_id": shift.id, "person_id": shift.person_id }),
        );
        Ok(())
    }

    /// Adds or replaces a clock entry.
    ///
    /// # Errors
    ///
    /// - `PersonNotFound` for an unknown person
    /// - `InvalidTimeEntry` for a clock-out before the clock-in
    /// - `DayLocked` when the day is closed
    pub fn record_time_entry(&mut self, entry: TimeEntry, actor: &str) -> EngineResult<()> {
        self.person(&entry.person_id)?;
        if entry.recorded_minutes().is_some_and(|m| m < 0) {
            return Err(EngineError::InvalidTimeEntry {
                entry_id: entry.id,
                message: "clock_out is before clock_in".to_string(),
            });
        }
        self.gate_person(entry.date, &entry.person_id)?;

        let date = entry.date;
        let details = serde_json::json!({
            "entry_id": entry.id,
            "person_id": entry.person_id,
            "complete": entry.is_complete(),
            "validated": entry.validated
        });
        match self.time_entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.time_entries.push(entry),
        }
        self.record(actor, AuditAction::TimeEntryRecorded, Some(date), details);
        Ok(())
    }

    /// Sets the hours for a person's day, replacing any earlier override.
    ///
    /// # Errors
    ///
    /// - `PersonNotFound` for an unknown person
    /// - `InvalidHourOverride` for negative hours
    /// - `DayLocked` when the day is closed
    pub fn set_hour_override(&mut self, hour_override: HourOverride, actor: &str) -> EngineResult<()> {
        self.person(&hour_override.person_id)?;
        if hour_override.hours < Decimal::ZERO {
            return Err(EngineError::InvalidHourOverride {
                person_id: hour_override.person_id,
                date: hour_override.date,
                message: format!("hours {} cannot be negative", hour_override.hours),
            });
        }
        self.gate_person(hour_override.date, &hour_override.person_id)?;

        let date = hour_override.date;
        let details = serde_json::json!({
            "person_id": hour_override.person_id,
            "hours": hour_override.hours.to_string(),
            "reason": hour_override.reason
        });
        self.overrides
            .retain(|o| !(o.person_id == hour_override.person_id && o.date == date));
        self.overrides.push(hour_override);
        self.record(actor, AuditAction::HourOverrideSet, Some(date), details);
        Ok(())
    }

    /// Removes the override for a person's day.
    pub fn clear_hour_override(
        &mut self,
        person_id: &str,
        date: NaiveDate,
        actor: &str,
    ) -> EngineResult<()> {
        if !self
            .overrides
            .iter()
            .any(|o| o.person_id == person_id && o.date == date)
        {
            return Err(EngineError::RecordNotFound {
                kind: "hour override".to_string(),
                id: format!("{}@{}", person_id, date),
            });
        }
        self.gate_person(date, person_id)?;

        self.overrides
            .retain(|o| !(o.person_id == person_id && o.date == date));
        self.record(
            actor,
            AuditAction::HourOverrideCleared,
            Some(date),
            serde_json::json!({ "person_id": person_id }),
        );
        Ok(())
    }

    /// Adds an adjustment. A global adjustment is gated on the whole day.
    ///
    /// # Errors
    ///
    /// - `PersonNotFound` for an unknown person
    /// - `InvalidAdjustment` for a duplicate id or a zero amount
    /// - `DayLocked` when the day is closed
    pub fn add_adjustment(&mut self, adjustment: Adjustment, actor: &str) -> EngineResult<()> {
        if let Some(person_id) = &adjustment.person_id {
            self.person(person_id)?;
        }
        if self.adjustments.iter().any(|a| a.id == adjustment.id) {
            return Err(EngineError::InvalidAdjustment {
                adjustment_id: adjustment.id,
                message: "an adjustment with this id already exists".to_string(),
            });
        }
        if adjustment.amount.is_zero() {
            return Err(EngineError::InvalidAdjustment {
                adjustment_id: adjustment.id,
                message: "amount cannot be zero".to_string(),
            });
        }
        self.gate_adjustment(&adjustment)?;

        let date = adjustment.date;
        let details = serde_json::json!({
            "adjustment_id": adjustment.id,
            "person_id": adjustment.person_id,
            "kind": adjustment.kind,
            "signed_amount": adjustment.signed_amount().to_string()
        });
        self.adjustments.push(adjustment);
        self.record(actor, AuditAction::AdjustmentAdded, Some(date), details);
        Ok(())
    }

    /// Removes an adjustment dated `date`.
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` when no adjustment with this id exists on `date`
    /// - `DayLocked` when the day is closed
    pub fn remove_adjustment(
        &mut self,
        date: NaiveDate,
        adjustment_id: &str,
        actor: &str,
    ) -> EngineResult<()> {
        let index = self
            .adjustments
            .iter()
            .position(|a| a.id == adjustment_id && a.date == date)
            .ok_or_else(|| EngineError::RecordNotFound {
                kind: "adjustment".to_string(),
                id: adjustment_id.to_string(),
            })?;
        self.gate_adjustment(&self.adjustments[index])?;

        let adjustment = self.adjustments.remove(index);
        self.record(
            actor,
            AuditAction::AdjustmentRemoved,
            Some(adjustment.date),
            serde_json::json!({ "adjustment_id": adjustment.id }),
        );
        Ok(())
    }

    /// Records the payout status of a person's day.
    ///
    /// Allowed on closed days: paying out a closed day is the usual flow.
    /// `paid_at` defaults to now for `paid`.
    pub fn set_payment_status(
        &mut self,
        mut record: PaymentStatusRecord,
        actor: &str,
    ) -> EngineResult<()> {
        self.person(&record.person_id)?;
        if record.status == PaymentStatus::Paid && record.paid_at.is_none() {
            record.paid_at = Some(Utc::now());
        }

        let date = record.date;
        let details = serde_json::json!({
            "person_id": record.person_id,
            "status": record.status,
            "reference": record.reference
        });
        self.payment_statuses
            .retain(|r| !(r.person_id == record.person_id && r.date == date));
        self.payment_statuses.push(record);
        self.record(actor, AuditAction::PaymentStatusSet, Some(date), details);
        Ok(())
    }

    /// Computes the day, stores the lines as a snapshot and locks the scope.
    ///
    /// # Errors
    ///
    /// Returns `DayLocked` if the day is already closed for `scope` or for
    /// every unit, plus any error from computing the day.
    pub fn close_day(
        &mut self,
        date: NaiveDate,
        scope: DayScope,
        actor: &str,
        config: &ConfigLoader,
    ) -> EngineResult<DayClosure> {
        if let Some(existing) = calculation::find_active_closure(&self.closures, date, &scope) {
            return Err(EngineError::DayLocked {
                date,
                scope: existing.scope.to_string(),
                closure_id: existing.id.clone(),
            });
        }

        let context = self.compute_day(date, &scope, config)?;
        let snapshot = context
            .lines
            .into_iter()
            .map(|mut line| {
                line.locked = true;
                line
            })
            .collect::<Vec<_>>();

        let closure = DayClosure {
            id: format!("closure_{}", Uuid::new_v4().simple()),
            date,
            scope: scope.clone(),
            closed_at: Utc::now(),
            closed_by: actor.to_string(),
            snapshot,
            reopening: None,
        };
        let details = serde_json::json!({
            "closure_id": closure.id,
            "scope": scope.to_string(),
            "lines": closure.snapshot.len(),
            "cost_total": context.totals.cost_total.to_string(),
            "payable_total": context.totals.payable_total.to_string()
        });
        self.closures.push(closure.clone());
        self.record(actor, AuditAction::DayClosed, Some(date), details);
        Ok(closure)
    }

    /// Reopens the active closure of exactly `scope` on `date`.
    ///
    /// The closure stays in the history with its reopening recorded.
    ///
    /// # Errors
    ///
    /// - `ReopenReasonRequired` for a blank reason
    /// - `DayNotClosed` when no active closure has exactly this scope
    pub fn reopen_day(
        &mut self,
        date: NaiveDate,
        scope: &DayScope,
        actor: &str,
        reason: &str,
    ) -> EngineResult<DayClosure> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(EngineError::ReopenReasonRequired { date });
        }
        let closure = self
            .closures
            .iter_mut()
            .find(|c| c.date == date && c.is_active() && &c.scope == scope)
            .ok_or_else(|| EngineError::DayNotClosed {
                date,
                scope: scope.to_string(),
            })?;

        closure.reopening = Some(Reopening {
            reopened_at: Utc::now(),
            reopened_by: actor.to_string(),
            reason: reason.to_string(),
        });
        let closure = closure.clone();
        self.record(
            actor,
            AuditAction::DayReopened,
            Some(date),
            serde_json::json!({
                "closure_id": closure.id,
                "scope": scope.to_string(),
                "reason": reason
            }),
        );
        Ok(closure)
    }
}
