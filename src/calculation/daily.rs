//! Day computation.
//!
//! Runs every calculation step for one date and scope and assembles the
//! [`DayPaymentContext`].

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{
    Adjustment, AuditStep, AuditTrace, AuditWarning, DayClosure, DayPaymentContext, DayScope,
    DayTotals, HourOverride, PaymentLine, PaymentRule, PaymentStatus, PaymentStatusRecord,
    Person, ScheduledShift, TimeEntry,
};

use super::{
    HoursSources, LineParts, aggregate_adjustments, build_pix_summary, calculate_base_amount,
    check_coverage, compose_payment_line, evaluate_day_lock, resolve_hours, resolve_payment_rule,
};

/// Warning code for day records that reference a person not on file.
pub const UNKNOWN_PERSON_WARNING: &str = "UNKNOWN_PERSON";

/// Every record a day computation reads. Records for other dates are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayInput<'a> {
    /// The roster.
    pub people: &'a [Person],
    /// Payment rules supplied with the day's data.
    pub rules: &'a [PaymentRule],
    /// Scheduled shifts.
    pub shifts: &'a [ScheduledShift],
    /// Clock entries.
    pub time_entries: &'a [TimeEntry],
    /// Hour overrides.
    pub overrides: &'a [HourOverride],
    /// Person and global adjustments.
    pub adjustments: &'a [Adjustment],
    /// Day closures, reopened ones included.
    pub closures: &'a [DayClosure],
    /// Recorded payout statuses.
    pub payment_statuses: &'a [PaymentStatusRecord],
}

impl DayInput<'_> {
    /// Returns true if the person has any record on `date` that puts them on
    /// the day's roster.
    fn has_activity(&self, person_id: &str, date: NaiveDate) -> bool {
        self.shifts
            .iter()
            .any(|s| s.person_id == person_id && s.date == date)
            || self
                .time_entries
                .iter()
                .any(|e| e.person_id == person_id && e.date == date)
            || self
                .overrides
                .iter()
                .any(|o| o.person_id == person_id && o.date == date)
            || self
                .adjustments
                .iter()
                .any(|a| a.date == date && a.person_id.as_deref() == Some(person_id))
    }

    /// The recorded payment status for a person's day, `pending` if none.
    fn status_for(&self, person_id: &str, date: NaiveDate) -> PaymentStatus {
        self.payment_statuses
            .iter()
            .rfind(|r| r.person_id == person_id && r.date == date)
            .map(|r| r.status)
            .unwrap_or_default()
    }

    /// Person ids referenced by day records but missing from `people`.
    fn unknown_people(&self, date: NaiveDate) -> BTreeSet<&str> {
        let known = |id: &str| self.people.iter().any(|p| p.id == id);
        self.shifts
            .iter()
            .filter(|s| s.date == date)
            .map(|s| s.person_id.as_str())
            .chain(
                self.time_entries
                    .iter()
                    .filter(|e| e.date == date)
                    .map(|e| e.person_id.as_str()),
            )
            .chain(
                self.overrides
                    .iter()
                    .filter(|o| o.date == date)
                    .map(|o| o.person_id.as_str()),
            )
            .chain(
                self.adjustments
                    .iter()
                    .filter(|a| a.date == date)
                    .filter_map(|a| a.person_id.as_deref()),
            )
            .filter(|&id| !known(id))
            .collect()
    }

    /// Copies closure snapshot lines with current statuses applied.
    fn snapshot_lines(&self, closure: &DayClosure, scope: &DayScope) -> Vec<PaymentLine> {
        closure
            .snapshot
            .iter()
            .filter(|line| scope.includes_unit(line.unit_id.as_deref()))
            .map(|line| {
                let mut line = line.clone();
                line.locked = true;
                line.status = self.status_for(&line.person_id, line.date);
                line
            })
            .collect()
    }
}

/// Computes every person's payment for `date` within `scope`.
///
/// When an active closure covers the scope, the closure's snapshot lines are
/// returned with current payment statuses and the context is read-only. When
/// only some units inside the scope are closed, those units come from their
/// snapshots and the rest is computed live.
///
/// # Errors
///
/// Propagates invalid rule, override and time entry errors from the
/// calculation steps.
///
/// # Examples
///
/// ```no_run
/// use daily_pay_engine::calculation::{DayInput, compute_day};
/// use daily_pay_engine::config::ConfigLoader;
/// use daily_pay_engine::models::DayScope;
/// use chrono::NaiveDate;
///
/// let config = ConfigLoader::load("./config/demo").unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let context = compute_day(DayInput::default(), date, &DayScope::All, &config).unwrap();
/// assert!(context.lines.is_empty());
/// ```
pub fn compute_day(
    input: DayInput<'_>,
    date: NaiveDate,
    scope: &DayScope,
    config: &ConfigLoader,
) -> EngineResult<DayPaymentContext> {
    let start_time = Instant::now();
    let settings = config.settings();
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let lock = evaluate_day_lock(input.closures, date, scope, step_number);
    steps.push(lock.audit_step.clone());
    step_number += 1;

    let mut lines: Vec<PaymentLine> = Vec::new();

    if let Some(closure) = lock.covering {
        lines.extend(input.snapshot_lines(closure, scope));
    } else {
        for closure in &lock.partial {
            lines.extend(input.snapshot_lines(closure, &closure.scope));
        }

        for person_id in input.unknown_people(date) {
            warnings.push(AuditWarning {
                code: UNKNOWN_PERSON_WARNING.to_string(),
                message: format!(
                    "Records on {} reference unknown person '{}' and were ignored",
                    date, person_id
                ),
                severity: "medium".to_string(),
                person_id: Some(person_id.to_string()),
            });
        }

        let role_defaults = config.role_default_rules();
        let sources = HoursSources {
            overrides: input.overrides,
            time_entries: input.time_entries,
            shifts: input.shifts,
            default_hours: settings.default_daily_hours,
        };

        // A person frozen in any snapshot that day is paid from it, even
        // after moving to another unit.
        let frozen: BTreeSet<&str> = input
            .closures
            .iter()
            .filter(|c| c.date == date && c.is_active())
            .flat_map(|c| c.snapshot.iter().map(|l| l.person_id.as_str()))
            .collect();

        let mut roster: Vec<&Person> = input
            .people
            .iter()
            .filter(|p| p.active)
            .filter(|p| scope.includes_unit(p.unit_id.as_deref()))
            .filter(|p| !frozen.contains(p.id.as_str()))
            .filter(|p| {
                !lock
                    .partial
                    .iter()
                    .any(|c| c.scope.includes_unit(p.unit_id.as_deref()))
            })
            .filter(|p| settings.include_unscheduled || input.has_activity(&p.id, date))
            .collect();
        roster.sort_by(|a, b| a.id.cmp(&b.id));
        roster.dedup_by(|a, b| a.id == b.id);

        for person in roster {
            let rule = resolve_payment_rule(person, date, input.rules, &role_defaults, step_number)?;
            steps.push(rule.audit_step);
            warnings.extend(rule.warning);
            step_number += 1;

            let hours = resolve_hours(&person.id, date, sources, step_number)?;
            steps.push(hours.audit_step);
            warnings.extend(hours.warnings);
            step_number += 1;

            let base = calculate_base_amount(
                &rule.rule,
                &hours.resolution,
                settings.money_scale,
                &person.id,
                step_number,
            );
            steps.push(base.audit_step);
            step_number += 1;

            let adjustments = aggregate_adjustments(&person.id, date, input.adjustments, step_number);
            steps.push(adjustments.audit_step);
            step_number += 1;

            let composition = compose_payment_line(
                person,
                date,
                LineParts {
                    rule: rule.rule,
                    hours: hours.resolution,
                    base_amount: base.amount,
                    adjustments: adjustments.applied,
                    adjustments_total: adjustments.total,
                },
                input.status_for(&person.id, date),
                false,
                step_number,
            );
            steps.push(composition.audit_step);
            step_number += 1;

            lines.push(composition.line);
        }
    }

    lines.sort_by(|a, b| a.person_id.cmp(&b.person_id));

    let pix = build_pix_summary(&lines, input.people, step_number);
    steps.push(pix.audit_step);
    warnings.extend(pix.warnings);
    step_number += 1;

    let coverage = check_coverage(
        config.coverage_targets(),
        date,
        input.shifts,
        input.people,
        scope,
        step_number,
    );
    steps.push(coverage.audit_step);
    warnings.extend(coverage.warnings);

    let totals = DayTotals::from_lines(&lines);
    let duration_us = start_time.elapsed().as_micros() as u64;

    debug!(
        date = %date,
        scope = %scope,
        lines = lines.len(),
        read_only = lock.is_read_only(),
        cost_total = %totals.cost_total,
        payable_total = %totals.payable_total,
        duration_us,
        "Day computed"
    );

    Ok(DayPaymentContext {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        tenant_id: config.tenant().id.clone(),
        date,
        scope: scope.clone(),
        lines,
        totals,
        pix_summary: pix.summary,
        coverage_gaps: coverage.gaps,
        read_only: lock.is_read_only(),
        closure_id: lock.covering.map(|c| c.id.clone()),
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}
