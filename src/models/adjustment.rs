//! Adjustment ("additional") model.
//!
//! Adjustments add to or subtract from a person's computed day total.
//! An adjustment without a `person_id` is global: it applies to every
//! person included in that day's computation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The category of an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Performance or attendance bonus.
    Bonus,
    /// Transport subsidy.
    Transport,
    /// Meal subsidy.
    Meal,
    /// Extra pay agreed for overtime.
    Overtime,
    /// A deduction. Always applied as a negative amount.
    Discount,
    /// Anything else; the amount is applied with the sign it carries.
    Other,
}

/// A per-day monetary adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Unique identifier for the adjustment.
    pub id: String,
    /// The person it applies to. `None` makes it global for the day.
    #[serde(default)]
    pub person_id: Option<String>,
    /// The day it applies to.
    pub date: NaiveDate,
    /// The category.
    pub kind: AdjustmentKind,
    /// The amount as entered.
    pub amount: Decimal,
    /// Free-text description shown on payslips.
    #[serde(default)]
    pub description: Option<String>,
}

impl Adjustment {
    /// Returns true if the adjustment applies to everyone on its day.
    pub fn is_global(&self) -> bool {
        self.person_id.is_none()
    }

    /// Returns the amount with discounts forced negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use daily_pay_engine::models::{Adjustment, AdjustmentKind};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let discount = Adjustment {
    ///     id: "adj_1".to_string(),
    ///     person_id: Some("p_001".to_string()),
    ///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
    ///     kind: AdjustmentKind::Discount,
    ///     amount: Decimal::new(15, 0),
    ///     description: None,
    /// };
    /// assert_eq!(discount.signed_amount(), Decimal::new(-15, 0));
    /// ```
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            AdjustmentKind::Discount => -self.amount.abs(),
            _ => self.amount,
        }
    }
}
