//! Effective hours resolution.
//!
//! This module decides how many hours count for a person's day and records
//! where they came from. Sources are tried in order: explicit override,
//! completed time entries, scheduled shifts, then the tenant default.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, HourOverride, HoursResolution, HoursSource, ScheduledShift,
    TimeEntry,
};

/// Warning code for time entries still on the clock.
pub const OPEN_TIME_ENTRY_WARNING: &str = "OPEN_TIME_ENTRY";

/// Decimal places effective hours are rounded to.
pub const HOURS_SCALE: u32 = 2;

/// The result of resolving a person's hours, including the audit step.
#[derive(Debug, Clone)]
pub struct HoursResolutionResult {
    /// The effective hours and their provenance.
    pub resolution: HoursResolution,
    /// The audit step recording the decision.
    pub audit_step: AuditStep,
    /// Warnings about ignored records.
    pub warnings: Vec<AuditWarning>,
}

/// The records that can supply hours for one person on one day.
#[derive(Debug, Clone, Copy)]
pub struct HoursSources<'a> {
    /// Hour overrides (any person, any date; filtered here).
    pub overrides: &'a [HourOverride],
    /// Clock entries (any person, any date; filtered here).
    pub time_entries: &'a [TimeEntry],
    /// Scheduled shifts (any person, any date; filtered here).
    pub shifts: &'a [ScheduledShift],
    /// Hours used when nothing else applies.
    pub default_hours: Decimal,
}

/// Resolves the effective hours for a person on a date.
///
/// # Precedence
///
/// 1. An [`HourOverride`] always wins, including an override of zero. When
///    several exist, the last one listed is used.
/// 2. Completed [`TimeEntry`] records are summed. Open entries are ignored
///    with an [`OPEN_TIME_ENTRY_WARNING`].
/// 3. [`ScheduledShift`] hours are summed.
/// 4. `default_hours`.
///
/// `shift_count` is the number of scheduled shifts, else the number of
/// completed entries, else 1; it is 0 whenever the resolved hours are 0.
///
/// # Errors
///
/// - `InvalidHourOverride` for negative override hours
/// - `InvalidTimeEntry` for a clock-out before the clock-in
pub fn resolve_hours(
    person_id: &str,
    date: NaiveDate,
    sources: HoursSources<'_>,
    step_number: u32,
) -> EngineResult<HoursResolutionResult> {
    let mut warnings = Vec::new();

    let hour_override = sources
        .overrides
        .iter()
        .rfind(|o| o.person_id == person_id && o.date == date);

    let shifts: Vec<&ScheduledShift> = sources
        .shifts
        .iter()
        .filter(|s| s.person_id == person_id && s.date == date)
        .collect();

    let mut completed_entries: Vec<&TimeEntry> = Vec::new();
    for entry in sources
        .time_entries
        .iter()
        .filter(|e| e.person_id == person_id && e.date == date)
    {
        match entry.recorded_minutes() {
            Some(minutes) if minutes < 0 => {
                return Err(EngineError::InvalidTimeEntry {
                    entry_id: entry.id.clone(),
                    message: "clock_out is before clock_in".to_string(),
                });
            }
            Some(_) => completed_entries.push(entry),
            None => warnings.push(AuditWarning {
                code: OPEN_TIME_ENTRY_WARNING.to_string(),
                message: format!(
                    "Time entry '{}' has no clock-out and was ignored",
                    entry.id
                ),
                severity: "low".to_string(),
                person_id: Some(person_id.to_string()),
            }),
        }
    }

    let (hours, source, validated, provisional_count, detail) = if let Some(o) = hour_override {
        if o.hours < Decimal::ZERO {
            return Err(EngineError::InvalidHourOverride {
                person_id: person_id.to_string(),
                date,
                message: format!("hours {} cannot be negative", o.hours),
            });
        }
        (
            o.hours,
            HoursSource::Override,
            true,
            shifts.len() as u32,
            format!("override by {}", o.author),
        )
    } else if !completed_entries.is_empty() {
        let minutes: i64 = completed_entries
            .iter()
            .filter_map(|e| e.recorded_minutes())
            .sum();
        let validated = completed_entries.iter().all(|e| e.validated);
        (
            Decimal::new(minutes, 0) / Decimal::new(60, 0),
            HoursSource::TimeEntry,
            validated,
            completed_entries.len() as u32,
            format!("{} completed time entries", completed_entries.len()),
        )
    } else if !shifts.is_empty() {
        let hours: Decimal = shifts.iter().map(|s| s.scheduled_hours()).sum();
        (
            hours,
            HoursSource::Schedule,
            false,
            shifts.len() as u32,
            format!("{} scheduled shifts", shifts.len()),
        )
    } else {
        (
            sources.default_hours,
            HoursSource::Default,
            false,
            0,
            "tenant default".to_string(),
        )
    };

    let hours = hours.round_dp(HOURS_SCALE);

    // Scheduled shifts count first; entries stand in when nothing was scheduled.
    let shift_count = if hours.is_zero() {
        0
    } else if !shifts.is_empty() {
        shifts.len() as u32
    } else if provisional_count > 0 {
        provisional_count
    } else {
        1
    };

    let resolution = HoursResolution {
        hours,
        source,
        overridden: source == HoursSource::Override,
        validated,
        shift_count,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "hours_resolution".to_string(),
        rule_name: "Effective Hours Resolution".to_string(),
        person_id: Some(person_id.to_string()),
        input: serde_json::json!({
            "date": date.to_string(),
            "has_override": hour_override.is_some(),
            "completed_time_entries": completed_entries.len(),
            "scheduled_shifts": shifts.len(),
            "default_hours": sources.default_hours.to_string()
        }),
        output: serde_json::json!({
            "hours": hours.normalize().to_string(),
            "source": resolution.source,
            "overridden": resolution.overridden,
            "validated": resolution.validated,
            "shift_count": shift_count
        }),
        reasoning: format!("{} hours from {}", hours.normalize(), detail),
    };

    Ok(HoursResolutionResult {
        resolution,
        audit_step,
        warnings,
    })
}
