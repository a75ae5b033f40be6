//! Payment line composition.
//!
//! Combines the resolved rule, hours, base amount and adjustments into the
//! final [`PaymentLine`] for a person's day.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    AppliedAdjustment, AuditStep, EmploymentType, HoursResolution, PaymentLine, PaymentStatus,
    Person, ResolvedRule,
};

/// The computed pieces of one person's day.
#[derive(Debug, Clone)]
pub struct LineParts {
    /// The rule applied.
    pub rule: ResolvedRule,
    /// The effective hours.
    pub hours: HoursResolution,
    /// The base amount produced by the rule.
    pub base_amount: Decimal,
    /// The applied adjustments.
    pub adjustments: Vec<AppliedAdjustment>,
    /// Sum of the applied adjustments.
    pub adjustments_total: Decimal,
}

/// The composed line and its audit step.
#[derive(Debug, Clone)]
pub struct LineComposition {
    /// The payment line.
    pub line: PaymentLine,
    /// The audit step recording the composition.
    pub audit_step: AuditStep,
}

/// Returns the amount payable for the day.
///
/// Contractors are paid the whole day total. Salaried people have their base
/// covered by payroll, so only positive adjustments are payable. Never
/// negative.
///
/// # Examples
///
/// ```
/// use daily_pay_engine::calculation::payable_amount;
/// use daily_pay_engine::models::EmploymentType;
/// use rust_decimal::Decimal;
///
/// let total = Decimal::new(230, 0);
/// let adjustments = Decimal::new(50, 0);
/// assert_eq!(payable_amount(EmploymentType::Contractor, total, adjustments), total);
/// assert_eq!(payable_amount(EmploymentType::Salaried, total, adjustments), adjustments);
/// ```
pub fn payable_amount(
    employment_type: EmploymentType,
    total: Decimal,
    adjustments_total: Decimal,
) -> Decimal {
    let payable = match employment_type {
        EmploymentType::Contractor => total,
        EmploymentType::Salaried => adjustments_total,
    };
    payable.max(Decimal::ZERO)
}

/// Composes the payment line for a person's day.
pub fn compose_payment_line(
    person: &Person,
    date: NaiveDate,
    parts: LineParts,
    status: PaymentStatus,
    locked: bool,
    step_number: u32,
) -> LineComposition {
    let total = parts.base_amount + parts.adjustments_total;
    let payable = payable_amount(person.employment_type, total, parts.adjustments_total);

    let audit_step = AuditStep {
        step_number,
        rule_id: "line_composition".to_string(),
        rule_name: "Payment Line Composition".to_string(),
        person_id: Some(person.id.clone()),
        input: serde_json::json!({
            "employment_type": person.employment_type,
            "base_amount": parts.base_amount.to_string(),
            "adjustments_total": parts.adjustments_total.to_string()
        }),
        output: serde_json::json!({
            "total": total.to_string(),
            "payable_amount": payable.to_string(),
            "status": status,
            "locked": locked
        }),
        reasoning: match person.employment_type {
            EmploymentType::Contractor => format!(
                "Contractor: total R${} (base R${} + adjustments R${}), payable R${}",
                total, parts.base_amount, parts.adjustments_total, payable
            ),
            EmploymentType::Salaried => format!(
                "Salaried: base R${} covered by payroll, payable adjustments R${}",
                parts.base_amount, payable
            ),
        },
    };

    let line = PaymentLine {
        person_id: person.id.clone(),
        person_name: person.name.clone(),
        unit_id: person.unit_id.clone(),
        date,
        employment_type: person.employment_type,
        rule: parts.rule,
        hours: parts.hours,
        base_amount: parts.base_amount,
        adjustments: parts.adjustments,
        adjustments_total: parts.adjustments_total,
        total,
        payable_amount: payable,
        status,
        locked,
    };

    LineComposition { line, audit_step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HoursSource, RuleKind, RuleSource};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_person(employment_type: EmploymentType) -> Person {
        Person {
            id: "p_001".to_string(),
            name: "Ana Souza".to_string(),
            role_id: "cook".to_string(),
            unit_id: Some("kitchen".to_string()),
            employment_type,
            pix_key: Some("ana@example.com".to_string()),
            active: true,
        }
    }

    fn parts(base: &str, adjustments_total: &str) -> LineParts {
        LineParts {
            rule: ResolvedRule {
                rule_id: Some("role_default:cook".to_string()),
                kind: RuleKind::Daily,
                amount: dec(base),
                source: RuleSource::Role,
            },
            hours: HoursResolution {
                hours: dec("8"),
                source: HoursSource::Schedule,
                overridden: false,
                validated: false,
                shift_count: 1,
            },
            base_amount: dec(base),
            adjustments: vec![],
            adjustments_total: dec(adjustments_total),
        }
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_contractor_is_paid_total() {
        let result = compose_payment_line(
            &create_test_person(EmploymentType::Contractor),
            test_date(),
            parts("180", "20"),
            PaymentStatus::Pending,
            false,
            1,
        );
        assert_eq!(result.line.total, dec("200"));
        assert_eq!(result.line.payable_amount, dec("200"));
        assert_eq!(result.line.unit_id.as_deref(), Some("kitchen"));
    }

    #[test]
    fn test_salaried_is_paid_adjustments_only() {
        let result = compose_payment_line(
            &create_test_person(EmploymentType::Salaried),
            test_date(),
            parts("180", "20"),
            PaymentStatus::Pending,
            false,
            1,
        );
        assert_eq!(result.line.total, dec("200"));
        assert_eq!(result.line.payable_amount, dec("20"));
    }

    #[test]
    fn test_payable_never_negative() {
        assert_eq!(
            payable_amount(EmploymentType::Contractor, dec("-15"), dec("-195")),
            Decimal::ZERO
        );
        assert_eq!(
            payable_amount(EmploymentType::Salaried, dec("150"), dec("-30")),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_discount_can_make_total_negative() {
        let result = compose_payment_line(
            &create_test_person(EmploymentType::Contractor),
            test_date(),
            parts("50", "-80"),
            PaymentStatus::Pending,
            false,
            1,
        );
        assert_eq!(result.line.total, dec("-30"));
        assert_eq!(result.line.payable_amount, Decimal::ZERO);
    }

    #[test]
    fn test_status_and_lock_carried_through() {
        let result = compose_payment_line(
            &create_test_person(EmploymentType::Contractor),
            test_date(),
            parts("180", "0"),
            PaymentStatus::Paid,
            true,
            4,
        );
        assert_eq!(result.line.status, PaymentStatus::Paid);
        assert!(result.line.locked);
        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.output["status"], "paid");
    }
}
