//! Schedule, clock and override models.
//!
//! This module defines the three sources a day's hours can come from:
//! [`ScheduledShift`] (the plan), [`TimeEntry`] (what the clock recorded)
//! and [`HourOverride`] (what a manager decided), plus the
//! [`CoverageTarget`] used to flag scheduling gaps.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A planned shift on the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledShift {
    /// Unique identifier for the shift.
    pub id: String,
    /// The person scheduled.
    pub person_id: String,
    /// The date the shift starts on.
    pub date: NaiveDate,
    /// The unit the shift is worked at, if different from the person's own.
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Start time of day.
    pub start: NaiveTime,
    /// End time of day. An end earlier than the start crosses midnight.
    pub end: NaiveTime,
    /// Unpaid break minutes deducted from the shift.
    #[serde(default)]
    pub unpaid_break_minutes: u32,
}

impl ScheduledShift {
    /// Calculates the scheduled hours for the shift.
    ///
    /// Shifts whose end is earlier than their start run past midnight.
    /// Unpaid breaks are subtracted and the result never goes below zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use daily_pay_engine::models::ScheduledShift;
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rust_decimal::Decimal;
    ///
    /// let shift = ScheduledShift {
    ///     id: "s_001".to_string(),
    ///     person_id: "p_001".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
    ///     unit_id: None,
    ///     start: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
    ///     end: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
    ///     unpaid_break_minutes: 60,
    /// };
    /// assert_eq!(shift.scheduled_hours(), Decimal::new(11, 0));
    /// ```
    pub fn scheduled_hours(&self) -> Decimal {
        let worked = (self.span_minutes() - i64::from(self.unpaid_break_minutes)).max(0);
        Decimal::new(worked, 0) / Decimal::new(60, 0)
    }

    /// Minutes from start to end, breaks included.
    pub fn span_minutes(&self) -> i64 {
        let minutes = (self.end - self.start).num_minutes();
        if minutes < 0 {
            minutes + MINUTES_PER_DAY
        } else {
            minutes
        }
    }
}

/// A real-time clock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The person who clocked in.
    pub person_id: String,
    /// The work date the entry counts towards.
    pub date: NaiveDate,
    /// Clock-in instant.
    pub clock_in: DateTime<Utc>,
    /// Clock-out instant. `None` while the person is still on the clock.
    #[serde(default)]
    pub clock_out: Option<DateTime<Utc>>,
    /// Whether a manager has validated the entry.
    #[serde(default)]
    pub validated: bool,
}

impl TimeEntry {
    /// Returns true once the entry has a clock-out.
    pub fn is_complete(&self) -> bool {
        self.clock_out.is_some()
    }

    /// Returns the recorded minutes, or `None` while the entry is open.
    pub fn recorded_minutes(&self) -> Option<i64> {
        self.clock_out
            .map(|out| (out - self.clock_in).num_minutes())
    }
}

/// An explicit manager decision on how many hours count for a person's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourOverride {
    /// The person the override applies to.
    pub person_id: String,
    /// The date the override applies to.
    pub date: NaiveDate,
    /// The hours that count. Zero marks the person absent.
    pub hours: Decimal,
    /// Why the override was made.
    #[serde(default)]
    pub reason: Option<String>,
    /// Who made the override.
    pub author: String,
}

/// Minimum headcount for a role (optionally at one unit) on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTarget {
    /// The role that must be covered.
    pub role_id: String,
    /// Restrict the target to one unit.
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Restrict the target to one weekday. `None` means every day.
    #[serde(default)]
    pub weekday: Option<Weekday>,
    /// The minimum number of distinct people scheduled.
    pub min_headcount: u32,
}
