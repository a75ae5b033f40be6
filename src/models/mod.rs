//! Core data models for the Daily Payment Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod adjustment;
mod closure;
mod payment_result;
mod payment_rule;
mod person;
mod schedule;

pub use adjustment::{Adjustment, AdjustmentKind};
pub use closure::{DayClosure, DayScope, PaymentStatus, PaymentStatusRecord, Reopening};
pub use payment_result::{
    AppliedAdjustment, AuditStep, AuditTrace, AuditWarning, CoverageGap, DayPaymentContext,
    DayTotals, HoursResolution, HoursSource, PaymentLine, PixEntry, PixSummary, ResolvedRule,
    RuleSource,
};
pub use payment_rule::{PaymentRule, RuleKind, RuleScope};
pub use person::{EmploymentType, Person};
pub use schedule::{CoverageTarget, HourOverride, ScheduledShift, TimeEntry};
