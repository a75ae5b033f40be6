//! Payment result models for the Daily Payment Engine.
//!
//! This module contains the [`DayPaymentContext`] type and its associated
//! structures that capture all outputs of a day computation: per-person
//! payment lines, the PIX payout summary, coverage gaps, totals and the
//! audit trace.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AdjustmentKind, DayScope, EmploymentType, PaymentStatus, RuleKind};

/// Which tier of the rule lookup produced the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    /// A person-level rule.
    Person,
    /// A role default.
    Role,
    /// No rule matched; a zero-value rule was used.
    Fallback,
}

/// The payment rule applied to a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRule {
    /// The id of the rule, absent for the fallback.
    pub rule_id: Option<String>,
    /// How the amount is applied.
    pub kind: RuleKind,
    /// The rate.
    pub amount: Decimal,
    /// Which tier produced the rule.
    pub source: RuleSource,
}

/// Which source produced the effective hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursSource {
    /// An explicit manager override.
    Override,
    /// Completed real-time clock entries.
    TimeEntry,
    /// The sum of scheduled shifts.
    Schedule,
    /// The tenant's default daily hours.
    Default,
}

/// Effective hours for a person's day and where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursResolution {
    /// The hours that count.
    pub hours: Decimal,
    /// Where the hours came from.
    pub source: HoursSource,
    /// True when an override decided the hours.
    pub overridden: bool,
    /// True when the hours were confirmed by a manager.
    pub validated: bool,
    /// The number of shifts the day counts as.
    pub shift_count: u32,
}

/// An adjustment as it was applied to a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    /// The adjustment id.
    pub adjustment_id: String,
    /// The adjustment category.
    pub kind: AdjustmentKind,
    /// The amount after sign normalization.
    pub signed_amount: Decimal,
    /// True for a global adjustment.
    pub global: bool,
}

/// One person's computed payment for one day.
///
/// # Example
///
/// ```
/// use daily_pay_engine::models::{
///     EmploymentType, HoursResolution, HoursSource, PaymentLine, PaymentStatus, ResolvedRule,
///     RuleKind, RuleSource,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let line = PaymentLine {
///     person_id: "p_001".to_string(),
///     person_name: "Ana Souza".to_string(),
///     unit_id: None,
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     employment_type: EmploymentType::Contractor,
///     rule: ResolvedRule {
///         rule_id: Some("rule_cook".to_string()),
///         kind: RuleKind::Daily,
///         amount: Decimal::new(180, 0),
///         source: RuleSource::Role,
///     },
///     hours: HoursResolution {
///         hours: Decimal::new(8, 0),
///         source: HoursSource::Schedule,
///         overridden: false,
///         validated: false,
///         shift_count: 1,
///     },
///     base_amount: Decimal::new(180, 0),
///     adjustments: vec![],
///     adjustments_total: Decimal::ZERO,
///     total: Decimal::new(180, 0),
///     payable_amount: Decimal::new(180, 0),
///     status: PaymentStatus::Pending,
///     locked: false,
/// };
/// assert_eq!(line.total, line.base_amount + line.adjustments_total);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLine {
    /// The person.
    pub person_id: String,
    /// The person's display name at computation time.
    pub person_name: String,
    /// The person's unit at computation time.
    #[serde(default)]
    pub unit_id: Option<String>,
    /// The day.
    pub date: NaiveDate,
    /// The person's engagement type at computation time.
    pub employment_type: EmploymentType,
    /// The rule applied.
    pub rule: ResolvedRule,
    /// The effective hours.
    pub hours: HoursResolution,
    /// The amount produced by the rule.
    pub base_amount: Decimal,
    /// The adjustments applied, ordered by id.
    pub adjustments: Vec<AppliedAdjustment>,
    /// Sum of the signed adjustments.
    pub adjustments_total: Decimal,
    /// Cost of the day: base plus adjustments.
    pub total: Decimal,
    /// What is paid out for the day. Never negative.
    pub payable_amount: Decimal,
    /// The payout status.
    pub status: PaymentStatus,
    /// True when the line comes from a closed day.
    pub locked: bool,
}

/// One PIX payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixEntry {
    /// The person paid.
    pub person_id: String,
    /// The person's display name.
    pub person_name: String,
    /// The key the payout goes to.
    pub pix_key: String,
    /// The payout amount.
    pub amount: Decimal,
    /// The payout status.
    pub status: PaymentStatus,
}

/// The PIX payout summary for a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixSummary {
    /// Payouts, in line order.
    pub entries: Vec<PixEntry>,
    /// Sum of the entry amounts.
    pub total: Decimal,
    /// People with a payable amount but no PIX key.
    pub missing_pix_key: Vec<String>,
    /// Number of lines with a payable amount.
    pub payable_count: u32,
}

/// A role (and unit) scheduled below its coverage target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// The under-covered role.
    pub role_id: String,
    /// The unit, when the target is unit-specific.
    pub unit_id: Option<String>,
    /// The target headcount.
    pub required: u32,
    /// Distinct people scheduled.
    pub scheduled: u32,
    /// `required - scheduled`.
    pub missing: u32,
}

/// Aggregated totals for a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotals {
    /// Sum of line base amounts.
    pub base_total: Decimal,
    /// Sum of line adjustment totals.
    pub adjustments_total: Decimal,
    /// Sum of line totals: the day's cost.
    pub cost_total: Decimal,
    /// Sum of payable amounts.
    pub payable_total: Decimal,
    /// Sum of effective hours.
    pub hours_total: Decimal,
    /// Number of lines.
    pub people_count: u32,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The person the step concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag data that needs attention but does not stop the computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
    /// The person the warning concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
}

/// The complete audit trace for a computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of computing one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPaymentContext {
    /// Unique identifier for this computation.
    pub calculation_id: Uuid,
    /// When the computation ran.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that ran it.
    pub engine_version: String,
    /// The tenant.
    pub tenant_id: String,
    /// The day.
    pub date: NaiveDate,
    /// The scope computed.
    pub scope: DayScope,
    /// Payment lines, ordered by person id.
    pub lines: Vec<PaymentLine>,
    /// Aggregated totals.
    pub totals: DayTotals,
    /// PIX payouts.
    pub pix_summary: PixSummary,
    /// Roles scheduled below target.
    pub coverage_gaps: Vec<CoverageGap>,
    /// True when the whole scope is closed and nothing may change.
    pub read_only: bool,
    /// The active closure the lines were taken from.
    pub closure_id: Option<String>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl DayTotals {
    /// Sums the given lines.
    pub fn from_lines(lines: &[PaymentLine]) -> Self {
        lines.iter().fold(DayTotals::default(), |mut acc, line| {
            acc.base_total += line.base_amount;
            acc.adjustments_total += line.adjustments_total;
            acc.cost_total += line.total;
            acc.payable_total += line.payable_amount;
            acc.hours_total += line.hours.hours;
            acc.people_count += 1;
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_line(person_id: &str, base: &str, adjustments: &str, payable: &str) -> PaymentLine {
        let base = dec(base);
        let adjustments_total = dec(adjustments);
        PaymentLine {
            person_id: person_id.to_string(),
            person_name: person_id.to_uppercase(),
            unit_id: None,
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            employment_type: EmploymentType::Contractor,
            rule: ResolvedRule {
                rule_id: None,
                kind: RuleKind::Hourly,
                amount: dec("20"),
                source: RuleSource::Role,
            },
            hours: HoursResolution {
                hours: dec("8"),
                source: HoursSource::Schedule,
                overridden: false,
                validated: false,
                shift_count: 1,
            },
            base_amount: base,
            adjustments: vec![],
            adjustments_total,
            total: base + adjustments_total,
            payable_amount: dec(payable),
            status: PaymentStatus::Pending,
            locked: false,
        }
    }

    #[test]
    fn test_totals_sum_lines() {
        let lines = vec![
            create_sample_line("p_001", "160.00", "12.50", "172.50"),
            create_sample_line("p_002", "180.00", "-20.00", "160.00"),
        ];

        let totals = DayTotals::from_lines(&lines);
        assert_eq!(totals.base_total, dec("340.00"));
        assert_eq!(totals.adjustments_total, dec("-7.50"));
        assert_eq!(totals.cost_total, dec("332.50"));
        assert_eq!(totals.payable_total, dec("332.50"));
        assert_eq!(totals.hours_total, dec("16"));
        assert_eq!(totals.people_count, 2);
    }

    #[test]
    fn test_totals_of_no_lines_are_zero() {
        let totals = DayTotals::from_lines(&[]);
        assert_eq!(totals, DayTotals::default());
        assert_eq!(totals.cost_total, Decimal::ZERO);
    }

    #[test]
    fn test_payment_line_serialization() {
        let line = create_sample_line("p_001", "160.00", "0", "160.00");
        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"person_id\":\"p_001\""));
        assert!(json.contains("\"base_amount\":\"160.00\""));
        assert!(json.contains("\"source\":\"schedule\""));
        assert!(json.contains("\"status\":\"pending\""));
    }

    #[test]
    fn test_audit_step_skips_missing_person() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "day_lock_gate".to_string(),
            rule_name: "Day Lock Gate".to_string(),
            person_id: None,
            input: serde_json::json!({}),
            output: serde_json::json!({}),
            reasoning: "Day is open".to_string(),
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(!json.contains("person_id"));
    }

    #[test]
    fn test_audit_warning_serialization() {
        let warning = AuditWarning {
            code: "MISSING_PIX_KEY".to_string(),
            message: "No PIX key".to_string(),
            severity: "medium".to_string(),
            person_id: Some("p_001".to_string()),
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"MISSING_PIX_KEY\""));
        assert!(json.contains("\"person_id\":\"p_001\""));
    }

    #[test]
    fn test_hours_source_serialization() {
        assert_eq!(
            serde_json::to_string(&HoursSource::TimeEntry).unwrap(),
            "\"time_entry\""
        );
        assert_eq!(
            serde_json::to_string(&RuleSource::Fallback).unwrap(),
            "\"fallback\""
        );
    }
}
