//! Calculation logic for the Daily Payment Engine.
//!
//! This module contains every step of a day computation: payment rule
//! resolution, effective hours resolution, base amount calculation,
//! adjustment aggregation, payment line composition, the day-lock gate, the
//! PIX payout summary and the coverage check, plus [`compute_day`] which runs
//! them in order.

mod adjustments;
mod base_amount;
mod coverage;
mod daily;
mod day_lock;
mod hours_resolver;
mod line_composer;
mod pix_summary;
mod rule_resolver;

pub use adjustments::{AdjustmentAggregation, aggregate_adjustments};
pub use base_amount::{BaseAmountResult, calculate_base_amount, round_money};
pub use coverage::{COVERAGE_GAP_WARNING, CoverageResult, check_coverage};
pub use daily::{DayInput, UNKNOWN_PERSON_WARNING, compute_day};
pub use day_lock::{
    DayLockEvaluation, ensure_day_unlocked, ensure_person_unlocked, ensure_unlocked,
    evaluate_day_lock, find_active_closure,
};
pub use hours_resolver::{
    HOURS_SCALE, HoursResolutionResult, HoursSources, OPEN_TIME_ENTRY_WARNING, resolve_hours,
};
pub use line_composer::{LineComposition, LineParts, compose_payment_line, payable_amount};
pub use pix_summary::{MISSING_PIX_KEY_WARNING, PixSummaryResult, build_pix_summary};
pub use rule_resolver::{NO_PAYMENT_RULE_WARNING, RuleResolution, resolve_payment_rule};
