//! Error types for the Daily Payment Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing daily payments
//! or mutating the day ledger.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Daily Payment Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use daily_pay_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/tenant.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/tenant.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A person referenced by a record does not exist in the roster.
    #[error("Person not found: {person_id}")]
    PersonNotFound {
        /// The id that was not found.
        person_id: String,
    },

    /// A record referenced by id does not exist.
    #[error("{kind} not found: {id}")]
    RecordNotFound {
        /// The kind of record (e.g. "adjustment", "shift").
        kind: String,
        /// The id that was not found.
        id: String,
    },

    /// A payment rule was invalid.
    #[error("Invalid payment rule '{rule_id}': {message}")]
    InvalidPaymentRule {
        /// The id of the invalid rule.
        rule_id: String,
        /// A description of what made the rule invalid.
        message: String,
    },

    /// An hour override was invalid.
    #[error("Invalid hour override for '{person_id}' on {date}: {message}")]
    InvalidHourOverride {
        /// The person the override targets.
        person_id: String,
        /// The date of the override.
        date: NaiveDate,
        /// A description of what made the override invalid.
        message: String,
    },

    /// A time entry was invalid or contained inconsistent data.
    #[error("Invalid time entry '{entry_id}': {message}")]
    InvalidTimeEntry {
        /// The id of the invalid entry.
        entry_id: String,
        /// A description of what made the entry invalid.
        message: String,
    },

    /// A scheduled shift was invalid.
    #[error("Invalid shift '{shift_id}': {message}")]
    InvalidShift {
        /// The id of the invalid shift.
        shift_id: String,
        /// A description of what made the shift invalid.
        message: String,
    },

    /// An adjustment was invalid.
    #[error("Invalid adjustment '{adjustment_id}': {message}")]
    InvalidAdjustment {
        /// The id of the invalid adjustment.
        adjustment_id: String,
        /// A description of what made the adjustment invalid.
        message: String,
    },

    /// The day is closed for the requested scope and cannot be changed.
    #[error("Day {date} is locked for scope '{scope}' (closure '{closure_id}')")]
    DayLocked {
        /// The locked date.
        date: NaiveDate,
        /// The scope of the active closure.
        scope: String,
        /// The id of the active closure.
        closure_id: String,
    },

    /// A reopen was requested for a day that has no active closure.
    #[error("Day {date} has no active closure for scope '{scope}'")]
    DayNotClosed {
        /// The date that was not closed.
        date: NaiveDate,
        /// The requested scope.
        scope: String,
    },

    /// Reopening a closed day requires a reason for the audit log.
    #[error("A reason is required to reopen day {date}")]
    ReopenReasonRequired {
        /// The date being reopened.
        date: NaiveDate,
    },

    /// Ledger state could not be read from or written to disk.
    #[error("State file error '{path}': {message}")]
    StateIo {
        /// The state file path.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_record_not_found_displays_kind_and_id() {
        let error = EngineError::RecordNotFound {
            kind: "adjustment".to_string(),
            id: "adj_9".to_string(),
        };
        assert_eq!(error.to_string(), "adjustment not found: adj_9");
    }

    #[test]
    fn test_day_locked_displays_date_scope_and_closure() {
        let error = EngineError::DayLocked {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            scope: "all".to_string(),
            closure_id: "cls_1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Day 2026-03-02 is locked for scope 'all' (closure 'cls_1')"
        );
    }

    #[test]
    fn test_invalid_hour_override_displays_person_and_date() {
        let error = EngineError::InvalidHourOverride {
            person_id: "p_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            message: "hours cannot be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid hour override for 'p_001' on 2026-03-02: hours cannot be negative"
        );
    }

    #[test]
    fn test_reopen_reason_required_displays_date() {
        let error = EngineError::ReopenReasonRequired {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "A reason is required to reopen day 2026-03-02"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_locked() -> EngineResult<()> {
            Err(EngineError::DayNotClosed {
                date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                scope: "all".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_locked()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
