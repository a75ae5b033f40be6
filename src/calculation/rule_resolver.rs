//! Payment rule resolution.
//!
//! This module picks the payment rule that applies to a person on a date:
//! a person-level rule first, then the role default, then a zero-value
//! fallback.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, PaymentRule, Person, ResolvedRule, RuleKind, RuleSource,
};

/// Warning code emitted when a person falls through to the zero-value rule.
pub const NO_PAYMENT_RULE_WARNING: &str = "NO_PAYMENT_RULE";

/// The result of resolving a person's payment rule.
#[derive(Debug, Clone)]
pub struct RuleResolution {
    /// The rule that applies.
    pub rule: ResolvedRule,
    /// The audit step recording the lookup.
    pub audit_step: AuditStep,
    /// Set when the fallback was used.
    pub warning: Option<AuditWarning>,
}

/// Picks the latest effective rule among `candidates`.
///
/// Rules without `effective_from` rank below dated ones. Among equals the
/// rule listed last wins.
fn latest_effective<'a, I>(candidates: I, date: NaiveDate) -> Option<&'a PaymentRule>
where
    I: Iterator<Item = &'a PaymentRule>,
{
    candidates
        .filter(|r| r.is_effective_on(date))
        .max_by_key(|r| r.effective_from)
}

/// Determines the payment rule for a person on a date.
///
/// Lookup order:
/// 1. person-scoped rules in `rules`
/// 2. role-scoped rules in `rules`
/// 3. role defaults from configuration (`role_defaults`)
/// 4. a `daily` rule of zero, with a [`NO_PAYMENT_RULE_WARNING`] warning
///
/// # Errors
///
/// Returns `InvalidPaymentRule` if the selected rule has a negative amount.
///
/// # Examples
///
/// ```
/// use daily_pay_engine::calculation::resolve_payment_rule;
/// use daily_pay_engine::models::{
///     EmploymentType, PaymentRule, Person, RuleKind, RuleScope, RuleSource,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let person = Person {
///     id: "p_001".to_string(),
///     name: "Ana".to_string(),
///     role_id: "nurse".to_string(),
///     unit_id: None,
///     employment_type: EmploymentType::Contractor,
///     pix_key: None,
///     active: true,
/// };
/// let rules = vec![PaymentRule {
///     id: "r_ana".to_string(),
///     scope: RuleScope::Person("p_001".to_string()),
///     kind: RuleKind::Hourly,
///     amount: Decimal::new(30, 0),
///     effective_from: None,
/// }];
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
///
/// let resolution = resolve_payment_rule(&person, date, &rules, &[], 1).unwrap();
/// assert_eq!(resolution.rule.source, RuleSource::Person);
/// ```
pub fn resolve_payment_rule(
    person: &Person,
    date: NaiveDate,
    rules: &[PaymentRule],
    role_defaults: &[PaymentRule],
    step_number: u32,
) -> EngineResult<RuleResolution> {
    let selected = latest_effective(
        rules.iter().filter(|r| r.applies_to_person(&person.id)),
        date,
    )
    .map(|r| (r, RuleSource::Person))
    .or_else(|| {
        latest_effective(
            rules.iter().filter(|r| r.applies_to_role(&person.role_id)),
            date,
        )
        .map(|r| (r, RuleSource::Role))
    })
    .or_else(|| {
        latest_effective(
            role_defaults
                .iter()
                .filter(|r| r.applies_to_role(&person.role_id)),
            date,
        )
        .map(|r| (r, RuleSource::Role))
    });

    let input = serde_json::json!({
        "person_id": person.id,
        "role_id": person.role_id,
        "date": date.to_string()
    });

    let Some((rule, source)) = selected else {
        let audit_step = AuditStep {
            step_number,
            rule_id: "payment_rule_lookup".to_string(),
            rule_name: "Payment Rule Lookup".to_string(),
            person_id: Some(person.id.clone()),
            input,
            output: serde_json::json!({
                "source": "fallback",
                "kind": "daily",
                "amount": "0"
            }),
            reasoning: format!(
                "No person rule or role default for role '{}' - using zero-value fallback",
                person.role_id
            ),
        };
        let warning = AuditWarning {
            code: NO_PAYMENT_RULE_WARNING.to_string(),
            message: format!(
                "No payment rule applies to '{}' (role '{}') on {}",
                person.id, person.role_id, date
            ),
            severity: "medium".to_string(),
            person_id: Some(person.id.clone()),
        };
        return Ok(RuleResolution {
            rule: ResolvedRule {
                rule_id: None,
                kind: RuleKind::Daily,
                amount: Decimal::ZERO,
                source: RuleSource::Fallback,
            },
            audit_step,
            warning: Some(warning),
        });
    };

    if rule.amount < Decimal::ZERO {
        return Err(EngineError::InvalidPaymentRule {
            rule_id: rule.id.clone(),
            message: format!("amount {} cannot be negative", rule.amount),
        });
    }

    let source_label = match source {
        RuleSource::Person => "person",
        RuleSource::Role => "role",
        RuleSource::Fallback => "fallback",
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "payment_rule_lookup".to_string(),
        rule_name: "Payment Rule Lookup".to_string(),
        person_id: Some(person.id.clone()),
        input,
        output: serde_json::json!({
            "rule_id": rule.id,
            "source": source_label,
            "kind": rule.kind,
            "amount": rule.amount.to_string(),
            "effective_from": rule.effective_from.map(|d| d.to_string())
        }),
        reasoning: format!(
            "Using {} rule '{}': {:?} at {}",
            source_label, rule.id, rule.kind, rule.amount
        ),
    };

    Ok(RuleResolution {
        rule: ResolvedRule {
            rule_id: Some(rule.id.clone()),
            kind: rule.kind,
            amount: rule.amount,
            source,
        },
        audit_step,
        warning: None,
    })
}
