//! Adjustment aggregation.
//!
//! Merges a person's own adjustments for a day with the day's global
//! adjustments, normalizing discounts to negative amounts.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Adjustment, AppliedAdjustment, AuditStep};

/// The result of aggregating adjustments for one person's day.
#[derive(Debug, Clone)]
pub struct AdjustmentAggregation {
    /// The applied adjustments, ordered by id.
    pub applied: Vec<AppliedAdjustment>,
    /// Sum of the signed amounts.
    pub total: Decimal,
    /// The audit step recording the aggregation.
    pub audit_step: AuditStep,
}

/// Aggregates the adjustments that apply to `person_id` on `date`.
///
/// Person-specific adjustments and global adjustments (no `person_id`) for
/// the date are both applied. Discounts are always negative.
///
/// # Examples
///
/// ```
/// use daily_pay_engine::calculation::aggregate_adjustments;
/// use daily_pay_engine::models::{Adjustment, AdjustmentKind};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let adjustments = vec![
///     Adjustment {
///         id: "adj_1".to_string(),
///         person_id: Some("p_001".to_string()),
///         date,
///         kind: AdjustmentKind::Bonus,
///         amount: Decimal::new(50, 0),
///         description: None,
///     },
///     Adjustment {
///         id: "adj_2".to_string(),
///         person_id: None,
///         date,
///         kind: AdjustmentKind::Discount,
///         amount: Decimal::new(10, 0),
///         description: None,
///     },
/// ];
///
/// let result = aggregate_adjustments("p_001", date, &adjustments, 1);
/// assert_eq!(result.total, Decimal::new(40, 0));
/// ```
pub fn aggregate_adjustments(
    person_id: &str,
    date: NaiveDate,
    adjustments: &[Adjustment],
    step_number: u32,
) -> AdjustmentAggregation {
    let mut applied: Vec<AppliedAdjustment> = adjustments
        .iter()
        .filter(|a| a.date == date)
        .filter(|a| a.person_id.as_deref().is_none_or(|p| p == person_id))
        .map(|a| AppliedAdjustment {
            adjustment_id: a.id.clone(),
            kind: a.kind,
            signed_amount: a.signed_amount(),
            global: a.is_global(),
        })
        .collect();
    applied.sort_by(|a, b| a.adjustment_id.cmp(&b.adjustment_id));

    let total: Decimal = applied.iter().map(|a| a.signed_amount).sum();
    let global_count = applied.iter().filter(|a| a.global).count();

    let audit_step = AuditStep {
        step_number,
        rule_id: "adjustment_aggregation".to_string(),
        rule_name: "Adjustment Aggregation".to_string(),
        person_id: Some(person_id.to_string()),
        input: serde_json::json!({
            "date": date.to_string(),
            "person_adjustments": applied.len() - global_count,
            "global_adjustments": global_count
        }),
        output: serde_json::json!({
            "applied": applied
                .iter()
                .map(|a| serde_json::json!({
                    "id": a.adjustment_id,
                    "kind": a.kind,
                    "signed_amount": a.signed_amount.to_string()
                }))
                .collect::<Vec<_>>(),
            "total": total.to_string()
        }),
        reasoning: if applied.is_empty() {
            "No adjustments apply".to_string()
        } else {
            format!(
                "{} adjustments ({} global) totalling R${}",
                applied.len(),
                global_count,
                total.normalize()
            )
        },
    };

    AdjustmentAggregation {
        applied,
        total,
        audit_step,
    }
}
