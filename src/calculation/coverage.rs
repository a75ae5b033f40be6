//! Coverage check.
//!
//! Compares the people scheduled for a day against the tenant's minimum
//! headcount per role and unit.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::models::{
    AuditStep, AuditWarning, CoverageGap, CoverageTarget, DayScope, Person, ScheduledShift,
};

/// Warning code for a role scheduled below its target.
pub const COVERAGE_GAP_WARNING: &str = "COVERAGE_GAP";

/// The coverage gaps for a day and their audit record.
#[derive(Debug, Clone)]
pub struct CoverageResult {
    /// One gap per under-covered target.
    pub gaps: Vec<CoverageGap>,
    /// The audit step recording the check.
    pub audit_step: AuditStep,
    /// One warning per gap.
    pub warnings: Vec<AuditWarning>,
}

/// Checks scheduled headcount against the coverage targets for `date`.
///
/// A target applies when its weekday is absent or matches the date. Under a
/// unit scope only targets for that unit are checked. Each target counts
/// distinct active people of its role with a shift that day; a shift's own
/// unit takes precedence over the person's home unit.
pub fn check_coverage(
    targets: &[CoverageTarget],
    date: NaiveDate,
    shifts: &[ScheduledShift],
    people: &[Person],
    scope: &DayScope,
    step_number: u32,
) -> CoverageResult {
    let weekday = date.weekday();
    let applicable: Vec<&CoverageTarget> = targets
        .iter()
        .filter(|t| t.weekday.is_none_or(|w| w == weekday))
        .filter(|t| match scope {
            DayScope::All => true,
            DayScope::Unit(unit) => t.unit_id.as_deref() == Some(unit.as_str()),
        })
        .collect();

    let mut gaps = Vec::new();
    let mut warnings = Vec::new();

    for target in &applicable {
        let scheduled: BTreeSet<&str> = shifts
            .iter()
            .filter(|s| s.date == date)
            .filter_map(|s| {
                let person = people
                    .iter()
                    .find(|p| p.id == s.person_id && p.active && p.role_id == target.role_id)?;
                let unit = s.unit_id.as_deref().or(person.unit_id.as_deref());
                match &target.unit_id {
                    Some(target_unit) if unit != Some(target_unit.as_str()) => None,
                    _ => Some(person.id.as_str()),
                }
            })
            .collect();

        let scheduled = scheduled.len() as u32;
        if scheduled < target.min_headcount {
            let gap = CoverageGap {
                role_id: target.role_id.clone(),
                unit_id: target.unit_id.clone(),
                required: target.min_headcount,
                scheduled,
                missing: target.min_headcount - scheduled,
            };
            warnings.push(AuditWarning {
                code: COVERAGE_GAP_WARNING.to_string(),
                message: format!(
                    "Role '{}'{} needs {} but has {} scheduled",
                    gap.role_id,
                    gap.unit_id
                        .as_deref()
                        .map(|u| format!(" in unit '{}'", u))
                        .unwrap_or_default(),
                    gap.required,
                    gap.scheduled
                ),
                severity: "medium".to_string(),
                person_id: None,
            });
            gaps.push(gap);
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "coverage_check".to_string(),
        rule_name: "Coverage Check".to_string(),
        person_id: None,
        input: serde_json::json!({
            "date": date.to_string(),
            "weekday": weekday.to_string(),
            "applicable_targets": applicable.len()
        }),
        output: serde_json::json!({
            "gaps": gaps.len(),
            "missing_headcount": gaps.iter().map(|g| g.missing).sum::<u32>()
        }),
        reasoning: if gaps.is_empty() {
            format!("All {} coverage targets met", applicable.len())
        } else {
            format!(
                "{} of {} coverage targets below minimum headcount",
                gaps.len(),
                applicable.len()
            )
        },
    };

    CoverageResult {
        gaps,
        audit_step,
        warnings,
    }
}
