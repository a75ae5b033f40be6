//! Base amount calculation.
//!
//! Applies a resolved payment rule to a person's effective hours.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditStep, HoursResolution, ResolvedRule, RuleKind};

/// The result of calculating a base amount, including the audit step.
#[derive(Debug, Clone)]
pub struct BaseAmountResult {
    /// The base amount, rounded to the money scale.
    pub amount: Decimal,
    /// The audit step recording the calculation.
    pub audit_step: AuditStep,
}

/// Rounds a monetary amount to `scale` decimal places, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use daily_pay_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("10.125").unwrap(), 2), Decimal::from_str("10.13").unwrap());
/// assert_eq!(round_money(Decimal::from_str("-10.125").unwrap(), 2), Decimal::from_str("-10.13").unwrap());
/// ```
pub fn round_money(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculates the base amount for a person's day.
///
/// - `hourly`: rate × hours
/// - `daily`: the flat rate when any hours count, otherwise zero
/// - `per_shift`: rate × shift count
///
/// # Examples
///
/// ```
/// use daily_pay_engine::calculation::calculate_base_amount;
/// use daily_pay_engine::models::{HoursResolution, HoursSource, ResolvedRule, RuleKind, RuleSource};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rule = ResolvedRule {
///     rule_id: Some("r_1".to_string()),
///     kind: RuleKind::Hourly,
///     amount: Decimal::from_str("18.50").unwrap(),
///     source: RuleSource::Role,
/// };
/// let hours = HoursResolution {
///     hours: Decimal::from_str("7.5").unwrap(),
///     source: HoursSource::Schedule,
///     overridden: false,
///     validated: false,
///     shift_count: 1,
/// };
///
/// let result = calculate_base_amount(&rule, &hours, 2, "p_001", 1);
/// assert_eq!(result.amount, Decimal::from_str("138.75").unwrap());
/// ```
pub fn calculate_base_amount(
    rule: &ResolvedRule,
    hours: &HoursResolution,
    money_scale: u32,
    person_id: &str,
    step_number: u32,
) -> BaseAmountResult {
    let (raw, reasoning) = match rule.kind {
        RuleKind::Hourly => (
            rule.amount * hours.hours,
            format!(
                "{}h × R${} per hour",
                hours.hours.normalize(),
                rule.amount.normalize()
            ),
        ),
        RuleKind::Daily if hours.hours > Decimal::ZERO => (
            rule.amount,
            format!("Flat daily rate R${}", rule.amount.normalize()),
        ),
        RuleKind::Daily => (
            Decimal::ZERO,
            "No hours count for the day - daily rate not due".to_string(),
        ),
        RuleKind::PerShift => (
            rule.amount * Decimal::from(hours.shift_count),
            format!(
                "{} shifts × R${} per shift",
                hours.shift_count,
                rule.amount.normalize()
            ),
        ),
    };

    let amount = round_money(raw, money_scale);

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_amount".to_string(),
        rule_name: "Base Amount Calculation".to_string(),
        person_id: Some(person_id.to_string()),
        input: serde_json::json!({
            "kind": rule.kind,
            "rate": rule.amount.normalize().to_string(),
            "hours": hours.hours.normalize().to_string(),
            "shift_count": hours.shift_count
        }),
        output: serde_json::json!({
            "amount": amount.to_string()
        }),
        reasoning: format!("{} = R${}", reasoning, amount),
    };

    BaseAmountResult { amount, audit_step }
}
