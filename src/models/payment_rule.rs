//! Payment rule model.
//!
//! A payment rule says how a person's base amount for a day is derived:
//! per hour, per day, or per shift. Rules are attached either to a single
//! person or to a role.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the rule amount is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// `amount` per worked hour.
    Hourly,
    /// Flat `amount` for any day with worked hours.
    Daily,
    /// `amount` per shift.
    PerShift,
}

/// Who a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// A person-level override.
    Person(String),
    /// A default for everyone holding the role.
    Role(String),
}

/// A payment rule.
///
/// # Example
///
/// ```
/// use daily_pay_engine::models::{PaymentRule, RuleKind, RuleScope};
/// use rust_decimal::Decimal;
///
/// let rule = PaymentRule {
///     id: "rule_cook".to_string(),
///     scope: RuleScope::Role("cook".to_string()),
///     kind: RuleKind::Daily,
///     amount: Decimal::new(18000, 2),
///     effective_from: None,
/// };
/// assert!(rule.applies_to_role("cook"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRule {
    /// Unique identifier for the rule.
    pub id: String,
    /// Who the rule applies to.
    pub scope: RuleScope,
    /// How the amount is applied.
    pub kind: RuleKind,
    /// Rate per hour, per day or per shift.
    pub amount: Decimal,
    /// First date the rule is in force. `None` means always.
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
}

impl PaymentRule {
    /// Returns true if this is a person-level rule for `person_id`.
    pub fn applies_to_person(&self, person_id: &str) -> bool {
        matches!(&self.scope, RuleScope::Person(id) if id == person_id)
    }

    /// Returns true if this is a role default for `role_id`.
    pub fn applies_to_role(&self, role_id: &str) -> bool {
        matches!(&self.scope, RuleScope::Role(id) if id == role_id)
    }

    /// Returns true if the rule is in force on `date`.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from.is_none_or(|from| from <= date)
    }
}
